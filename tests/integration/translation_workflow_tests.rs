/*!
 * End-to-end translation of catalogs through the controller
 */

use anyhow::Result;
use parking_lot::Mutex;
use xcstrings_translator::catalog::Catalog;
use xcstrings_translator::providers::mock::MockProvider;
use xcstrings_translator::session::TranslationSettings;
use xcstrings_translator::{AppError, Controller};

use crate::common;

fn controller_for(provider: &MockProvider, catalog: &str) -> Result<Controller<MockProvider>> {
    let mut controller = Controller::new(provider.clone(), TranslationSettings::default());
    controller.load_catalog(catalog)?;
    Ok(controller)
}

/// The greeting scenario: "Hello %@" comes back as "Bonjour %@" and lands in the catalog
#[tokio::test]
async fn test_translate_greeting_to_french_should_merge_bonjour() -> Result<()> {
    let provider = MockProvider::working().with_custom_translation(|text, _| text.replace("Hello", "Bonjour"));
    let mut controller = controller_for(&provider, common::GREETING_CATALOG)?;

    let summary = controller.translate_language("fr", false).await?;
    assert_eq!((summary.requested, summary.translated, summary.failed), (1, 1, 0));

    let output = Catalog::parse(&controller.output_json()?)?;
    let entry = output.entry("greeting").unwrap();
    assert_eq!(entry.value_for("fr"), Some("Bonjour %@"));
    assert_eq!(entry.value_for("en"), Some("Hello %@"));

    let fr = &controller.state().progress["fr"];
    assert_eq!((fr.translated_strings, fr.total_strings), (1, 1));
    assert!((fr.percentage() - 100.0).abs() < f64::EPSILON);
    Ok(())
}

/// A second default run sends nothing once every string is translated
#[tokio::test]
async fn test_translate_twice_without_force_should_be_idempotent() -> Result<()> {
    let provider = MockProvider::working();
    let mut controller = controller_for(&provider, &common::catalog_with_strings(25, &[1, 2, 3, 4, 5], &[]))?;

    let first = controller.translate_language("fr", false).await?;
    assert_eq!(first.requested, 20);
    assert_eq!(provider.request_count(), 2);

    let after_first = controller.output_json()?;
    let second = controller.translate_language("fr", false).await?;
    assert_eq!(second.requested, 0);
    assert_eq!(provider.request_count(), 2);
    assert_eq!(controller.output_json()?, after_first);
    assert!(!controller.state().is_translating);

    // Existing translations are left alone
    let output = Catalog::parse(&after_first)?;
    assert_eq!(output.entry("key1").unwrap().value_for("fr"), Some("Texte 1"));
    assert_eq!(output.entry("key6").unwrap().value_for("fr"), Some("[fr] Text 6"));
    Ok(())
}

/// Force refresh retranslates every eligible string
#[tokio::test]
async fn test_translate_with_force_refresh_should_send_every_string() -> Result<()> {
    let provider = MockProvider::working();
    let mut controller = controller_for(&provider, &common::catalog_with_strings(25, &[1, 2, 3, 4, 5], &[7]))?;

    let summary = controller.translate_language("fr", true).await?;
    assert_eq!(summary.requested, 24);
    assert_eq!(provider.request_count(), 3);

    let output = Catalog::parse(&controller.output_json()?)?;
    assert_eq!(output.entry("key1").unwrap().value_for("fr"), Some("[fr] Text 1"));
    assert_eq!(output.entry("key7").unwrap().value_for("fr"), None);
    Ok(())
}

/// Progress callbacks never go backwards and finish at the total
#[tokio::test]
async fn test_translate_with_progress_should_be_monotonic() -> Result<()> {
    let provider = MockProvider::working();
    let mut controller = controller_for(&provider, &common::catalog_with_strings(95, &[], &[]))?;
    let seen = Mutex::new(Vec::new());

    controller
        .translate_language_with_progress("de", false, |completed, total| {
            seen.lock().push((completed, total));
        })
        .await?;

    let seen = seen.into_inner();
    assert_eq!(seen.len(), 10);
    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    assert!(seen.iter().all(|&(_, total)| total == 95));
    assert_eq!(seen.last(), Some(&(95, 95)));
    Ok(())
}

/// Excluded keys are neither sent nor counted
#[tokio::test]
async fn test_translate_with_excluded_key_should_skip_it() -> Result<()> {
    let provider = MockProvider::working();
    let mut controller = controller_for(&provider, &common::catalog_with_strings(3, &[], &[]))?;
    controller.update(|s| s.toggle_exclusion("key2"));

    let summary = controller.translate_language("it", false).await?;
    assert_eq!(summary.requested, 2);

    let output = Catalog::parse(&controller.output_json()?)?;
    assert_eq!(output.entry("key2").unwrap().value_for("it"), None);
    assert_eq!(controller.state().progress["it"].total_strings, 2);
    Ok(())
}

/// Failed batches stay out of the catalog and are reported per language
#[tokio::test]
async fn test_translate_with_failing_provider_should_record_failures() -> Result<()> {
    let provider = MockProvider::failing();
    let mut controller = controller_for(&provider, &common::catalog_with_strings(12, &[], &[]))?;

    let summary = controller.translate_language("ko", false).await?;
    assert_eq!((summary.translated, summary.failed), (0, 12));

    let ko = &controller.state().progress["ko"];
    assert_eq!((ko.translated_strings, ko.failed_strings), (0, 12));
    assert!(!controller.state().is_translating);
    assert_eq!(Catalog::parse(&controller.output_json()?)?.existing_languages(), vec!["en"]);
    Ok(())
}

/// Several languages run one after another, skipping the source
#[tokio::test]
async fn test_translate_languages_should_skip_source_language() -> Result<()> {
    let provider = MockProvider::working();
    let mut controller = controller_for(&provider, common::GREETING_CATALOG)?;
    let codes = vec!["en".to_string(), "fr".to_string(), "ja".to_string()];

    let summaries = controller.translate_languages(&codes, false).await?;
    let languages: Vec<&str> = summaries.iter().map(|s| s.language_code.as_str()).collect();
    assert_eq!(languages, vec!["fr", "ja"]);
    assert_eq!(provider.request_count(), 2);

    let output = Catalog::parse(&controller.output_json()?)?;
    assert_eq!(output.existing_languages(), vec!["en", "fr", "ja"]);
    Ok(())
}

/// Malformed catalog text is reported as a catalog error
#[test]
fn test_load_catalog_with_missing_strings_should_fail() {
    let mut controller = Controller::new(MockProvider::working(), TranslationSettings::default());
    let result = controller.load_catalog(r#"{"sourceLanguage": "en", "version": "1.0"}"#);
    assert!(matches!(result, Err(AppError::Catalog(_))));
}
