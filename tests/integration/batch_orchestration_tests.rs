/*!
 * Batch orchestration against scripted providers
 */

use std::collections::HashMap;
use xcstrings_translator::providers::mock::MockProvider;
use xcstrings_translator::providers::openai::ResponseFormat;
use xcstrings_translator::translation::{
    BatchTranslator, ErrorKind, TranslationRequest, TranslationResult, TranslationService, partition_requests,
};

fn requests(count: usize, code: &str) -> Vec<TranslationRequest> {
    (1..=count)
        .map(|i| TranslationRequest {
            string_key: format!("key{}", i),
            source_text: format!("Text {}", i),
            target_language_code: code.to_string(),
            target_language_name: code.to_string(),
            comment: None,
            placeholders: Vec::new(),
            app_context: None,
        })
        .collect()
}

fn translator(provider: &MockProvider, model: &str) -> BatchTranslator<MockProvider> {
    BatchTranslator::new(TranslationService::new(provider.clone(), model))
}

fn by_key(results: Vec<TranslationResult>) -> HashMap<String, TranslationResult> {
    results.into_iter().map(|r| (r.string_key.clone(), r)).collect()
}

/// Partition sizes for a few representative totals
#[test]
fn test_partition_requests_should_fill_batches_of_ten() {
    let sizes = |n: usize| -> Vec<usize> {
        partition_requests(&requests(n, "fr"), 10).iter().map(|b| b.len()).collect()
    };
    assert!(sizes(0).is_empty());
    assert_eq!(sizes(1), vec![1]);
    assert_eq!(sizes(10), vec![10]);
    assert_eq!(sizes(23), vec![10, 10, 3]);
}

/// One failing batch among several fails only its own strings
#[tokio::test]
async fn test_translate_language_with_one_failing_batch_should_isolate_failure() {
    // Every third call fails
    let provider = MockProvider::intermittent(3);
    let results = translator(&provider, "gpt-4o-mini")
        .translate_language(&requests(30, "es"), |_, _| {})
        .await;

    assert_eq!(results.len(), 30);
    let failed: Vec<&TranslationResult> = results.iter().filter(|r| !r.success).collect();
    assert_eq!(failed.len(), 10);
    assert!(failed.iter().all(|r| r.error_kind() == Some(ErrorKind::TransportError)));
    assert!(failed.iter().all(|r| r.error.as_ref().is_some_and(|e| e.message.contains("503"))));
    assert_eq!(results.iter().filter(|r| r.success).count(), 20);
}

/// A batch of 5 answered without index 3 fails exactly the third string
#[tokio::test]
async fn test_translate_language_with_missing_index_should_fail_that_string_only() {
    let provider = MockProvider::omit_index(3);
    let results = by_key(
        translator(&provider, "gpt-4o-mini")
            .translate_language(&requests(5, "fr"), |_, _| {})
            .await,
    );

    assert_eq!(results.len(), 5);
    assert_eq!(results["key3"].error_kind(), Some(ErrorKind::MissingTranslation));
    assert_eq!(
        results["key3"].error.as_ref().map(|e| e.message.as_str()),
        Some("Translation not found in response")
    );
    for key in ["key1", "key2", "key4", "key5"] {
        assert!(results[key].success, "{} should succeed", key);
    }
    assert_eq!(results["key4"].translated_text, "[fr] Text 4");
}

/// Whole-batch response problems map to one kind per string
#[tokio::test]
async fn test_translate_language_with_bad_responses_should_classify() {
    let cases = [
        (MockProvider::empty(), ErrorKind::EmptyResponse),
        (MockProvider::malformed(), ErrorKind::MalformedResponse),
        (MockProvider::invalid_schema(), ErrorKind::InvalidSchema),
    ];

    for (provider, kind) in cases {
        let results = translator(&provider, "gpt-4o-mini")
            .translate_language(&requests(12, "de"), |_, _| {})
            .await;
        assert_eq!(results.len(), 12);
        assert!(results.iter().all(|r| !r.success && r.error_kind() == Some(kind)), "{:?}", kind);
    }
}

/// No more than ten batches are ever in flight
#[tokio::test]
async fn test_translate_language_with_many_batches_should_cap_concurrency() {
    let provider = MockProvider::slow(20);
    let results = translator(&provider, "gpt-4o-mini")
        .translate_language(&requests(250, "pl"), |_, _| {})
        .await;

    assert_eq!(results.len(), 250);
    assert_eq!(provider.request_count(), 25);
    assert_eq!(provider.max_in_flight(), 10);
}

/// Batch requests carry the structured-output schema and model-specific sampling
#[tokio::test]
async fn test_batch_requests_should_follow_model_rules() {
    let provider = MockProvider::working();
    translator(&provider, "gpt-5-mini")
        .translate_language(&requests(3, "sv"), |_, _| {})
        .await;
    translator(&provider, "gpt-4o")
        .translate_language(&requests(3, "sv"), |_, _| {})
        .await;

    let sent = provider.requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].model(), "gpt-5-mini");
    assert_eq!(sent[0].get_temperature(), None);
    assert_eq!(sent[1].get_temperature(), Some(0.3));
    for request in &sent {
        assert_eq!(request.get_max_completion_tokens(), Some(8000));
        assert!(matches!(request.response_format(), Some(ResponseFormat::JsonSchema { .. })));
    }
}

/// Single-string translation answers with free text
#[tokio::test]
async fn test_translate_one_should_trim_free_text_answer() {
    let provider = MockProvider::working();
    let service = TranslationService::new(provider.clone(), "gpt-4o-mini");
    let request = &requests(1, "nl")[0];

    let result = service.translate_one(request).await;
    assert!(result.success);
    assert_eq!(result.translated_text, "[nl] Text 1");
    assert_eq!(provider.requests()[0].get_max_completion_tokens(), Some(500));

    let result = TranslationService::new(MockProvider::empty(), "gpt-4o-mini")
        .translate_one(request)
        .await;
    assert_eq!(result.error_kind(), Some(ErrorKind::EmptyResponse));
}
