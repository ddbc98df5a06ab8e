/*!
 * Value types shared by the session state and its controller.
 */

use serde::{Deserialize, Serialize};

/// First step of the workflow (load a catalog)
pub const FIRST_STEP: u8 = 1;

/// Last step of the workflow (export the result)
pub const LAST_STEP: u8 = 5;

/// Model used when neither preferences nor configuration name one
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// User-provided settings that survive a session reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSettings {
    /// API key for the model provider
    pub api_key: String,
    /// Whether the API key should be persisted
    pub save_api_key: bool,
    /// Model identifier
    pub model: String,
    /// Free-text description of the app, passed to every request
    pub app_context: String,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            save_api_key: false,
            model: DEFAULT_MODEL.to_string(),
            app_context: String::new(),
        }
    }
}

impl TranslationSettings {
    /// App context, or `None` when blank
    pub fn app_context(&self) -> Option<&str> {
        Some(self.app_context.trim()).filter(|c| !c.is_empty())
    }
}

/// Outcome of translating one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageRunSummary {
    pub language_code: String,
    /// Strings sent for translation
    pub requested: usize,
    /// Strings merged into the catalog
    pub translated: usize,
    /// Strings that came back unsuccessful
    pub failed: usize,
}

impl LanguageRunSummary {
    /// Summary of a run that had nothing to translate
    pub fn nothing_to_do(language_code: &str) -> Self {
        Self {
            language_code: language_code.to_string(),
            requested: 0,
            translated: 0,
            failed: 0,
        }
    }
}
