/*!
 * Translation requests and results.
 *
 * A `TranslationRequest` is one unit of work: one source string into one
 * target language. Every request submitted to a run produces exactly one
 * `TranslationResult`, traceable to the request by `string_key`.
 */

use serde::Serialize;
use std::fmt;

use crate::catalog::{TranslatableString, extract_placeholders};
use crate::language_utils::get_language_name;

/// One string to translate into one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Catalog key of the string
    pub string_key: String,
    /// Text in the source language
    pub source_text: String,
    /// Target locale identifier, e.g. `fr` or `pt-BR`
    pub target_language_code: String,
    /// English display name of the target language
    pub target_language_name: String,
    /// Developer comment for translators
    pub comment: Option<String>,
    /// Placeholder tokens, in order of first occurrence
    pub placeholders: Vec<String>,
    /// Free-text description of the app, shared by a whole run
    pub app_context: Option<String>,
}

/// Build the requests translating `strings` into `target_language_code`
///
/// Blank app context is treated as absent.
pub fn build_requests(
    strings: &[TranslatableString],
    target_language_code: &str,
    app_context: Option<&str>,
) -> Vec<TranslationRequest> {
    let target_language_name = get_language_name(target_language_code);
    let app_context = app_context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    strings
        .iter()
        .map(|s| TranslationRequest {
            string_key: s.key.clone(),
            source_text: s.source_text.clone(),
            target_language_code: target_language_code.to_string(),
            target_language_name: target_language_name.clone(),
            comment: s.comment.clone().filter(|c| !c.trim().is_empty()),
            placeholders: extract_placeholders(&s.source_text),
            app_context: app_context.clone(),
        })
        .collect()
}

/// Why a single request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The model returned no usable content
    EmptyResponse,
    /// The content was not valid JSON
    MalformedResponse,
    /// The JSON had no `translations` list
    InvalidSchema,
    /// The batch answered, but not for this request's index
    MissingTranslation,
    /// Network, authentication, rate limit or API-side failure
    TransportError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::EmptyResponse => "Empty translation received",
            ErrorKind::MalformedResponse => "Failed to parse translation response",
            ErrorKind::InvalidSchema => "Invalid response structure",
            ErrorKind::MissingTranslation => "Translation not found in response",
            ErrorKind::TransportError => "Translation request failed",
        };
        f.write_str(text)
    }
}

/// Failure detail attached to an unsuccessful result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for TranslationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub string_key: String,
    pub target_language_code: String,
    pub success: bool,
    /// Empty when unsuccessful
    pub translated_text: String,
    pub error: Option<TranslationFailure>,
}

impl TranslationResult {
    /// Successful result for `request`
    pub fn translated(request: &TranslationRequest, text: impl Into<String>) -> Self {
        Self {
            string_key: request.string_key.clone(),
            target_language_code: request.target_language_code.clone(),
            success: true,
            translated_text: text.into(),
            error: None,
        }
    }

    /// Failed result with the kind's default message
    pub fn failed(request: &TranslationRequest, kind: ErrorKind) -> Self {
        Self::failed_with_message(request, kind, kind.to_string())
    }

    /// Failed result with an explicit message
    pub fn failed_with_message(request: &TranslationRequest, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            string_key: request.string_key.clone(),
            target_language_code: request.target_language_code.clone(),
            success: false,
            translated_text: String::new(),
            error: Some(TranslationFailure {
                kind,
                message: message.into(),
            }),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
