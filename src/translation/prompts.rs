/*!
 * Prompt and response-schema construction for translation requests.
 */

use serde::Serialize;
use serde_json::{Value, json};

use super::request::TranslationRequest;

/// Name of the structured-output schema for batch answers
pub const SCHEMA_NAME: &str = "translation_batch";

/// Line that precedes the JSON list of strings in a batch prompt
pub const STRINGS_HEADER: &str = "Strings to translate:\n";

/// Label in front of the target locale identifier in both prompt kinds
pub const LANGUAGE_CODE_LABEL: &str = "language code: ";

/// System message for batch translation
pub const SYSTEM_PROMPT: &str = "You are a native-speaking translator specializing in mobile app localization. \
You translate using CASUAL, NATURAL everyday language - avoiding formal or overly professional phrasing. \
You MUST preserve ALL technical elements like placeholders (e.g., %@, %1$@, %lld) and escape sequences \
(e.g., \\n, \\t) EXACTLY as they appear in the source text.";

/// System message for translating a single string
pub const SINGLE_SYSTEM_PROMPT: &str = "You are a professional translator specializing in iOS app localization. \
You preserve technical elements like placeholders and formatting while providing natural, culturally appropriate translations.";

/// One string as listed in a batch prompt
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptItem<'a> {
    index: usize,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_info: Option<String>,
}

/// `[CONTEXT: ...] [PLACEHOLDERS: ...]`, or `None` when there is neither
fn additional_info(request: &TranslationRequest) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(comment) = &request.comment {
        parts.push(format!("[CONTEXT: {}]", comment));
    }
    if !request.placeholders.is_empty() {
        parts.push(format!("[PLACEHOLDERS: {}]", request.placeholders.join(", ")));
    }
    if parts.is_empty() { None } else { Some(parts.join(" ")) }
}

/// User message for a batch; all requests share language and app context
pub fn batch_prompt(batch: &[TranslationRequest]) -> String {
    let Some(first) = batch.first() else {
        return String::new();
    };

    let items: Vec<PromptItem<'_>> = batch
        .iter()
        .enumerate()
        .map(|(i, request)| PromptItem {
            index: i + 1,
            text: &request.source_text,
            additional_info: additional_info(request),
        })
        .collect();
    let listing = serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string());

    let app_context = first
        .app_context
        .as_deref()
        .map(|context| {
            format!(
                "\n\nAPP CONTEXT:\n{}\n\nUse this context to make your translations more appropriate and natural for this specific app.",
                context
            )
        })
        .unwrap_or_default();

    format!(
        "Translate the following app interface strings into {name} ({label}{code}).{app_context}

TRANSLATION STYLE:
- Avoid overly formal but easy to understand language
- Use common words and phrases people actually say
- Match the natural speaking style of native speakers

CRITICAL TECHNICAL RULES:
1. Preserve ALL placeholders EXACTLY as they appear (e.g., %@, %1$@, %lld, etc.)
2. Keep placeholders in the SAME positions and order
3. Preserve ALL escape sequences (\\n, \\t, \\r) EXACTLY as they appear in the source text
4. Return exactly one translation per input string, using the same index

{header}{listing}",
        name = first.target_language_name,
        label = LANGUAGE_CODE_LABEL,
        code = first.target_language_code,
        app_context = app_context,
        header = STRINGS_HEADER,
        listing = listing,
    )
}

/// Free-text prompt for translating a single string
pub fn single_prompt(request: &TranslationRequest) -> String {
    let context = request
        .comment
        .as_deref()
        .map(|comment| format!("\n\nContext: {}", comment))
        .unwrap_or_default();
    let app_context = request
        .app_context
        .as_deref()
        .map(|context| format!("\n\nApp context: {}", context))
        .unwrap_or_default();
    let placeholders = if request.placeholders.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nIMPORTANT: This string contains placeholders ({}). You MUST preserve these EXACT placeholders in the translation in the SAME positions and order.",
            request.placeholders.join(", ")
        )
    };

    format!(
        "Translate the following iOS app string into {name} ({label}{code}).

Source text: \"{text}\"{context}{app_context}{placeholders}

Provide ONLY the translated text without any explanation, quotes, or additional commentary. \
The translation should be natural and appropriate for a mobile app interface.",
        name = request.target_language_name,
        label = LANGUAGE_CODE_LABEL,
        code = request.target_language_code,
        text = request.source_text,
    )
}

/// Strict JSON schema for `{ translations: [{ index, translated }] }`
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "translations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "index": {
                            "type": "number",
                            "description": "The index of the string being translated (matches input index)"
                        },
                        "translated": {
                            "type": "string",
                            "description": "The translated text with all placeholders and escape sequences preserved"
                        }
                    },
                    "required": ["index", "translated"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["translations"],
        "additionalProperties": false
    })
}
