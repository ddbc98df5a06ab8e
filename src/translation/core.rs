/*!
 * Core translation service implementation.
 *
 * `TranslationService` turns one batch of requests into one structured
 * chat-completions call and maps the answer back to per-request results.
 * Nothing here returns an error: every failure becomes a failed result.
 */

use log::{debug, warn};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, Provider};
use crate::providers::openai::{OpenAIRequest, TokenUsage};

use super::prompts::{self, SCHEMA_NAME, SINGLE_SYSTEM_PROMPT, SYSTEM_PROMPT};
use super::request::{ErrorKind, TranslationRequest, TranslationResult};

/// Sampling temperature for models that accept one
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Output cap for a batch answer
pub const BATCH_MAX_COMPLETION_TOKENS: u32 = 8000;

/// Output cap for a single-string answer
pub const SINGLE_MAX_COMPLETION_TOKENS: u32 = 500;

/// Model family that rejects the temperature parameter
const NO_TEMPERATURE_PREFIX: &str = "gpt-5";

/// Whether requests for `model` may carry a temperature
pub fn supports_temperature(model: &str) -> bool {
    !model.starts_with(NO_TEMPERATURE_PREFIX)
}

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Number of completed API calls
    pub requests: u64,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent waiting on API requests
    pub api_duration: Duration,

    /// Model name
    pub model: String,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl TokenUsageStats {
    /// Create empty stats for `model`
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            requests: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            model: model.into(),
        }
    }

    /// Record one API call
    pub fn record(&mut self, usage: Option<&TokenUsage>, elapsed: Duration) {
        self.requests += 1;
        self.api_duration += elapsed;
        if let Some(usage) = usage {
            self.prompt_tokens += u64::from(usage.prompt_tokens);
            self.completion_tokens += u64::from(usage.completion_tokens);
            self.total_tokens += u64::from(usage.total_tokens);
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        format!(
            "Token Usage Summary:\n\
             Model: {}\n\
             API calls: {}\n\
             Prompt tokens: {}\n\
             Completion tokens: {}\n\
             Total tokens: {}\n\
             Elapsed time: {:.2} seconds",
            self.model,
            self.requests,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens,
            self.start_time.elapsed().as_secs_f64(),
        )
    }
}

/// Translation service bound to one provider and model
#[derive(Debug)]
pub struct TranslationService<P> {
    provider: Arc<P>,
    model: String,
    token_stats: Arc<Mutex<TokenUsageStats>>,
}

impl<P> Clone for TranslationService<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            model: self.model.clone(),
            token_stats: Arc::clone(&self.token_stats),
        }
    }
}

impl<P: ChatProvider> TranslationService<P> {
    /// Create a new translation service
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            provider: Arc::new(provider),
            token_stats: Arc::new(Mutex::new(TokenUsageStats::new(model.clone()))),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Snapshot of accumulated token usage
    pub fn token_usage(&self) -> TokenUsageStats {
        self.token_stats.lock().clone()
    }

    fn base_request(&self, max_completion_tokens: u32) -> OpenAIRequest {
        let request = OpenAIRequest::new(&self.model).max_completion_tokens(max_completion_tokens);
        if supports_temperature(&self.model) {
            request.temperature(DEFAULT_TEMPERATURE)
        } else {
            request
        }
    }

    /// Chat request for one batch
    pub fn batch_request(&self, batch: &[TranslationRequest]) -> OpenAIRequest {
        self.base_request(BATCH_MAX_COMPLETION_TOKENS)
            .add_message("system", SYSTEM_PROMPT)
            .add_message("user", prompts::batch_prompt(batch))
            .json_schema(SCHEMA_NAME, prompts::response_schema())
    }

    /// Chat request for one string
    pub fn single_request(&self, request: &TranslationRequest) -> OpenAIRequest {
        self.base_request(SINGLE_MAX_COMPLETION_TOKENS)
            .add_message("system", SINGLE_SYSTEM_PROMPT)
            .add_message("user", prompts::single_prompt(request))
    }

    /// Send one request and return the response text
    async fn call(&self, request: OpenAIRequest) -> Result<String, ProviderError> {
        let started = Instant::now();
        let result = self.provider.complete(request).await;
        let elapsed = started.elapsed();

        let response = result?;
        self.token_stats.lock().record(response.usage.as_ref(), elapsed);
        Ok(P::extract_text(&response))
    }

    /// Translate one batch; the results follow the batch order
    pub async fn translate_batch(&self, batch: &[TranslationRequest]) -> Vec<TranslationResult> {
        if batch.is_empty() {
            return Vec::new();
        }

        debug!(
            "Sending batch of {} strings to {} ({})",
            batch.len(),
            self.model,
            batch[0].target_language_code
        );

        match self.call(self.batch_request(batch)).await {
            Ok(content) => parse_batch_response(batch, &content),
            Err(e) => {
                warn!("Batch translation to {} failed: {}", batch[0].target_language_code, e);
                batch
                    .iter()
                    .map(|r| TranslationResult::failed_with_message(r, ErrorKind::TransportError, e.to_string()))
                    .collect()
            }
        }
    }

    /// Translate one string with a free-text answer
    pub async fn translate_one(&self, request: &TranslationRequest) -> TranslationResult {
        match self.call(self.single_request(request)).await {
            Ok(content) => {
                let text = content.trim();
                if text.is_empty() {
                    TranslationResult::failed(request, ErrorKind::EmptyResponse)
                } else {
                    TranslationResult::translated(request, text)
                }
            }
            Err(e) => {
                warn!("Translation of '{}' failed: {}", request.string_key, e);
                TranslationResult::failed_with_message(request, ErrorKind::TransportError, e.to_string())
            }
        }
    }
}

/// Map a structured batch answer back to the batch
///
/// Empty, non-JSON and schema-violating content fail the whole batch with the
/// same kind. Otherwise each position is matched by its 1-based `index`, and
/// only positions without a string `translated` fail.
pub fn parse_batch_response(batch: &[TranslationRequest], content: &str) -> Vec<TranslationResult> {
    let fail_all = |kind: ErrorKind| -> Vec<TranslationResult> {
        batch.iter().map(|r| TranslationResult::failed(r, kind)).collect()
    };

    let content = content.trim();
    if content.is_empty() {
        return fail_all(ErrorKind::EmptyResponse);
    }

    let parsed: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            debug!("Unparseable batch response: {}", e);
            return fail_all(ErrorKind::MalformedResponse);
        }
    };

    let Some(translations) = parsed.get("translations").and_then(Value::as_array) else {
        return fail_all(ErrorKind::InvalidSchema);
    };

    batch
        .iter()
        .enumerate()
        .map(|(i, request)| {
            let position = (i + 1) as f64;
            let translated = translations
                .iter()
                .find(|t| t.get("index").and_then(Value::as_f64) == Some(position))
                .and_then(|t| t.get("translated"))
                .and_then(Value::as_str);

            match translated {
                Some(text) => TranslationResult::translated(request, text),
                None => TranslationResult::failed(request, ErrorKind::MissingTranslation),
            }
        })
        .collect()
}
