/*!
 * Mock provider for testing.
 *
 * The mock speaks the chat-completions types so it can stand in for the
 * OpenAI client anywhere a `ChatProvider` is expected:
 * - `MockProvider::working()` - answers every batch by echoing each string
 *   with a `[<lang>]` prefix
 * - `MockProvider::failing()` - always fails with a transport error
 * - `MockProvider::omit_index(n)` - drops one entry from every batch answer
 * - other behaviors produce empty, malformed or schema-violating content
 *
 * It records every request and the peak number of concurrent calls.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::openai::{OpenAIRequest, OpenAIResponse, TokenUsage};
use crate::translation::prompts::{LANGUAGE_CODE_LABEL, STRINGS_HEADER};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a translation for every input
    Working,
    /// Always fails with an error
    Failing,
    /// Returns empty content
    Empty,
    /// Returns content that is not JSON
    Malformed,
    /// Returns JSON without a `translations` array
    InvalidSchema,
    /// Succeeds but leaves out the entry with this 1-based index
    OmitIndex { index: usize },
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Calls currently awaiting a response
    in_flight: Arc<AtomicUsize>,
    /// Highest value `in_flight` reached
    max_in_flight: Arc<AtomicUsize>,
    /// Every request received, in arrival order
    requests: Arc<Mutex<Vec<OpenAIRequest>>>,
    /// Custom translation for one source text (optional)
    custom_translation: Option<fn(&str, &str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_translation: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that returns non-JSON content
    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    /// Create a mock whose JSON lacks the translations list
    pub fn invalid_schema() -> Self {
        Self::new(MockBehavior::InvalidSchema)
    }

    /// Create a mock that drops one index from every batch
    pub fn omit_index(index: usize) -> Self {
        Self::new(MockBehavior::OmitIndex { index })
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that waits before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Translate with `generator(source_text, language_code)` instead of the default prefix
    pub fn with_custom_translation(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_translation = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Peak number of calls that were awaiting a response at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Copies of every request received
    pub fn requests(&self) -> Vec<OpenAIRequest> {
        self.requests.lock().clone()
    }

    /// Default mock translation of one string
    pub fn default_translation(text: &str, language_code: &str) -> String {
        format!("[{}] {}", language_code, text)
    }

    /// Build a batch answer for a request; `omit` drops one 1-based index
    fn batch_answer(&self, request: &OpenAIRequest, omit: Option<usize>) -> String {
        let prompt = request.last_message("user").unwrap_or_default();
        let language = language_code_in(prompt);
        let translate = self.custom_translation.unwrap_or(Self::default_translation);

        let Some(items) = strings_in(prompt) else {
            // Single-string prompt: answer with free text
            let source = quoted_source_in(prompt).unwrap_or(prompt);
            return translate(source, &language);
        };

        let translations: Vec<Value> = items
            .iter()
            .filter_map(|item| {
                let index = item.get("index")?.as_u64()? as usize;
                let text = item.get("text")?.as_str()?;
                if omit == Some(index) {
                    return None;
                }
                Some(json!({"index": index, "translated": translate(text, &language)}))
            })
            .collect();

        json!({ "translations": translations }).to_string()
    }

    fn respond(&self, request: &OpenAIRequest, count: usize) -> Result<String, ProviderError> {
        match self.behavior {
            MockBehavior::Working | MockBehavior::Slow { .. } => Ok(self.batch_answer(request, None)),
            MockBehavior::OmitIndex { index } => Ok(self.batch_answer(request, Some(index))),
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated provider failure".to_string(),
            )),
            MockBehavior::Empty => Ok("   ".to_string()),
            MockBehavior::Malformed => Ok("Sure! Here are your translations: ...".to_string()),
            MockBehavior::InvalidSchema => Ok(json!({"result": []}).to_string()),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.batch_answer(request, None))
                }
            }
        }
    }
}

/// Parse the JSON array following the strings header of a batch prompt
fn strings_in(prompt: &str) -> Option<Vec<Value>> {
    let start = prompt.find(STRINGS_HEADER)? + STRINGS_HEADER.len();
    serde_json::from_str(prompt[start..].trim()).ok()
}

/// Language code written as `(language code: xx)` in both prompt kinds
fn language_code_in(prompt: &str) -> String {
    prompt
        .find(LANGUAGE_CODE_LABEL)
        .map(|start| &prompt[start + LANGUAGE_CODE_LABEL.len()..])
        .and_then(|rest| rest.split(')').next())
        .map(|code| code.trim().to_string())
        .unwrap_or_default()
}

/// Text between the quotes of `Source text: "..."` in a single-string prompt
fn quoted_source_in(prompt: &str) -> Option<&str> {
    let start = prompt.find("Source text: \"")? + "Source text: \"".len();
    let rest = &prompt[start..];
    let end = rest.find("\"\n\n").or_else(|| rest.rfind('"'))?;
    Some(&rest[..end])
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        // Every call yields at least once so sibling futures interleave
        match self.behavior {
            MockBehavior::Slow { delay_ms } => tokio::time::sleep(Duration::from_millis(delay_ms)).await,
            _ => tokio::task::yield_now().await,
        }

        let text = self.respond(&request, count)?;
        let mut response = OpenAIResponse::from_text(text);
        response.usage = Some(TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        });
        Ok(response)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::AuthenticationError("Simulated invalid key".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default()
    }
}
