/*!
 * Tests for session state transitions
 */

use xcstrings_translator::session::{FIRST_STEP, LAST_STEP, SessionState, TranslationSettings};
use xcstrings_translator::translation::{ErrorKind, TranslationRequest, TranslationResult};

use crate::common;

fn loaded(count: usize, translated: &[usize]) -> SessionState {
    SessionState::default()
        .load_catalog(&common::catalog_with_strings(count, translated, &[]))
        .unwrap()
}

fn request(key: &str, code: &str) -> TranslationRequest {
    TranslationRequest {
        string_key: key.to_string(),
        source_text: "Text".to_string(),
        target_language_code: code.to_string(),
        target_language_name: code.to_string(),
        comment: None,
        placeholders: Vec::new(),
        app_context: None,
    }
}

/// Navigation is clamped to the workflow's steps
#[test]
fn test_step_navigation_should_clamp() {
    let state = SessionState::default();
    assert_eq!(state.step, FIRST_STEP);
    assert_eq!(state.clone().previous_step().step, FIRST_STEP);
    assert_eq!(state.clone().go_to_step(99).step, LAST_STEP);
    assert_eq!(state.next_step().next_step().step, FIRST_STEP + 2);
}

/// Loading selects the catalog's languages and computes progress
#[test]
fn test_load_catalog_should_select_existing_languages() {
    let state = loaded(4, &[1, 2]);

    assert_eq!(state.source_language, "en");
    assert_eq!(state.selected_languages, vec!["en", "fr"]);
    let fr = &state.progress["fr"];
    assert_eq!((fr.translated_strings, fr.total_strings), (2, 4));
    assert_eq!(state.progress["en"].translated_strings, 4);
}

/// Excluding a key removes it from every language's total
#[test]
fn test_toggle_exclusion_should_update_totals() {
    let state = loaded(4, &[1]).toggle_exclusion("key1");
    assert_eq!(state.progress["fr"].total_strings, 3);
    assert_eq!(state.progress["fr"].translated_strings, 0);

    let state = state.toggle_exclusion("key1");
    assert_eq!(state.progress["fr"].total_strings, 4);
}

/// Reset keeps the settings and drops everything else
#[test]
fn test_reset_should_keep_settings() {
    let settings = TranslationSettings {
        model: "gpt-5-mini".to_string(),
        ..TranslationSettings::default()
    };
    let state = loaded(2, &[]).with_settings(settings.clone()).next_step().reset();

    assert!(state.catalog.is_none());
    assert_eq!(state.step, FIRST_STEP);
    assert_eq!(state.settings, settings);
}

/// A finished run merges successes and records failures
#[test]
fn test_apply_results_should_merge_and_count_failures() {
    let state = loaded(3, &[]).begin_translation("de");
    assert!(state.is_translating);
    assert!(state.progress["de"].in_progress);

    let results = vec![
        TranslationResult::translated(&request("key1", "de"), "Text 1 (de)"),
        TranslationResult::failed(&request("key2", "de"), ErrorKind::EmptyResponse),
    ];
    let state = state.apply_results("de", &results);

    assert!(!state.is_translating);
    let de = &state.progress["de"];
    assert_eq!((de.translated_strings, de.failed_strings), (1, 1));
    assert!(!de.in_progress);
}

/// Removing every language leaves only the source
#[test]
fn test_remove_all_languages_should_keep_source_only() {
    let state = loaded(2, &[1, 2]).add_language("ja").remove_all_languages();
    assert_eq!(state.selected_languages, vec!["en"]);
    assert_eq!(state.catalog.unwrap().existing_languages(), vec!["en"]);
}

/// Reporting on chosen languages leaves the other selected ones out
#[test]
fn test_progress_for_with_languages_should_restrict_rows() {
    let state = loaded(2, &[1]).add_language("de");
    assert_eq!(state.selected_languages, vec!["en", "fr", "de"]);

    let codes: Vec<&str> = state
        .progress_for(&["fr".to_string()])
        .iter()
        .map(|p| p.language_code.as_str())
        .collect();
    assert_eq!(codes, vec!["fr"]);

    let all: Vec<&str> = state.progress_for(&[]).iter().map(|p| p.language_code.as_str()).collect();
    assert_eq!(all, vec!["de", "en", "fr"]);
}
