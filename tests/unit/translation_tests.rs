/*!
 * Tests for request building, prompts and batch response parsing
 */

use std::collections::HashSet;
use xcstrings_translator::catalog::Catalog;
use xcstrings_translator::translation::prompts::{SCHEMA_NAME, batch_prompt, single_prompt};
use xcstrings_translator::translation::{ErrorKind, TranslationRequest, build_requests, parse_batch_response};

use crate::common;

fn greeting_requests(app_context: Option<&str>) -> Vec<TranslationRequest> {
    let catalog = Catalog::parse(common::GREETING_CATALOG).unwrap();
    build_requests(&catalog.translatable_strings(&HashSet::new()), "fr", app_context)
}

/// The greeting string becomes one French request carrying its placeholder
#[test]
fn test_build_requests_with_greeting_should_extract_placeholder() {
    let requests = greeting_requests(Some("  Chat app "));

    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.string_key, "greeting");
    assert_eq!(request.source_text, "Hello %@");
    assert_eq!(request.target_language_name, "French");
    assert_eq!(request.placeholders, vec!["%@"]);
    assert_eq!(request.app_context.as_deref(), Some("Chat app"));
}

/// Whitespace-only app context is dropped
#[test]
fn test_build_requests_with_blank_context_should_drop_it() {
    assert_eq!(greeting_requests(Some("   "))[0].app_context, None);
    assert_eq!(greeting_requests(None)[0].app_context, None);
}

/// The batch prompt names the language and lists indexed strings with placeholders
#[test]
fn test_batch_prompt_should_list_indexed_strings() {
    let prompt = batch_prompt(&greeting_requests(Some("Chat app")));

    assert!(prompt.contains("into French (language code: fr)"));
    assert!(prompt.contains("APP CONTEXT:\nChat app"));
    assert!(prompt.contains("\"index\": 1"));
    assert!(prompt.contains("\"text\": \"Hello %@\""));
    assert!(prompt.contains("[PLACEHOLDERS: %@]"));
}

/// The single-string prompt quotes the source and calls out placeholders
#[test]
fn test_single_prompt_should_quote_source() {
    let prompt = single_prompt(&greeting_requests(None)[0]);
    assert!(prompt.contains("Source text: \"Hello %@\""));
    assert!(prompt.contains("placeholders (%@)"));
    assert!(!prompt.contains("App context"));
}

/// Schema name matches what the remote side expects
#[test]
fn test_schema_name_should_be_translation_batch() {
    assert_eq!(SCHEMA_NAME, "translation_batch");
}

/// Extra and out-of-range indexes are ignored; absent ones fail individually
#[test]
fn test_parse_batch_response_with_extra_index_should_ignore_it() {
    let requests = greeting_requests(None);
    let results = parse_batch_response(
        &requests,
        r#"{"translations":[{"index":7,"translated":"x"},{"index":1,"translated":"Bonjour %@"}]}"#,
    );
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].translated_text, "Bonjour %@");

    let results = parse_batch_response(&requests, r#"{"translations":[{"index":1,"translated":42}]}"#);
    assert_eq!(results[0].error_kind(), Some(ErrorKind::MissingTranslation));
}
