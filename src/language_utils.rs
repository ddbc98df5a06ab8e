use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for catalog language codes
///
/// Catalogs use Apple locale identifiers: an ISO 639-1 (or 639-2) language
/// code optionally followed by a script or region subtag (`zh-Hans`, `pt-BR`).
/// The supported list mirrors the languages offered for translation; codes
/// outside it are still accepted when their base language is a known ISO code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedLanguage {
    /// Locale identifier as written in the catalog
    pub code: &'static str,
    /// English display name
    pub name: &'static str,
    /// Name in the language itself
    pub native: &'static str,
}

const fn lang(code: &'static str, name: &'static str, native: &'static str) -> SupportedLanguage {
    SupportedLanguage { code, name, native }
}

/// Languages offered for translation
pub const SUPPORTED_LANGUAGES: &[SupportedLanguage] = &[
    lang("ar", "Arabic", "العربية"),
    lang("zh-Hans", "Chinese (Simplified)", "简体中文"),
    lang("zh-Hant", "Chinese (Traditional)", "繁體中文"),
    lang("cs", "Czech", "Čeština"),
    lang("da", "Danish", "Dansk"),
    lang("nl", "Dutch", "Nederlands"),
    lang("en", "English", "English"),
    lang("en-AU", "English (Australia)", "English (Australia)"),
    lang("en-GB", "English (UK)", "English (UK)"),
    lang("fi", "Finnish", "Suomi"),
    lang("fr", "French", "Français"),
    lang("fr-CA", "French (Canada)", "Français (Canada)"),
    lang("de", "German", "Deutsch"),
    lang("el", "Greek", "Ελληνικά"),
    lang("he", "Hebrew", "עברית"),
    lang("hi", "Hindi", "हिन्दी"),
    lang("hu", "Hungarian", "Magyar"),
    lang("id", "Indonesian", "Bahasa Indonesia"),
    lang("it", "Italian", "Italiano"),
    lang("ja", "Japanese", "日本語"),
    lang("ko", "Korean", "한국어"),
    lang("ms", "Malay", "Bahasa Melayu"),
    lang("no", "Norwegian", "Norsk"),
    lang("pl", "Polish", "Polski"),
    lang("pt-BR", "Portuguese (Brazil)", "Português (Brasil)"),
    lang("pt-PT", "Portuguese (Portugal)", "Português (Portugal)"),
    lang("ro", "Romanian", "Română"),
    lang("ru", "Russian", "Русский"),
    lang("sk", "Slovak", "Slovenčina"),
    lang("es", "Spanish", "Español"),
    lang("es-MX", "Spanish (Mexico)", "Español (México)"),
    lang("sv", "Swedish", "Svenska"),
    lang("th", "Thai", "ไทย"),
    lang("tr", "Turkish", "Türkçe"),
    lang("uk", "Ukrainian", "Українська"),
    lang("vi", "Vietnamese", "Tiếng Việt"),
];

/// Default source language for new catalogs
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

/// Look up a language in the supported list (exact match on the identifier)
pub fn find_supported_language(code: &str) -> Option<&'static SupportedLanguage> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == code)
}

/// Base language subtag of a locale identifier (`pt-BR` -> `pt`)
pub fn base_language(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}

/// Resolve the ISO language for the base subtag of a locale identifier
fn iso_language(code: &str) -> Option<Language> {
    let base = base_language(code.trim()).to_lowercase();
    match base.len() {
        2 => Language::from_639_1(&base),
        3 => Language::from_639_3(&base),
        _ => None,
    }
}

/// Validate a locale identifier
///
/// Accepts everything in the supported list and any identifier whose base
/// subtag is a valid ISO 639-1 or ISO 639-3 code.
pub fn validate_language_code(code: &str) -> Result<()> {
    if find_supported_language(code).is_some() || iso_language(code).is_some() {
        Ok(())
    } else {
        Err(anyhow!("Invalid language code: {}", code))
    }
}

/// English display name for a locale identifier
///
/// Uses the supported list first, then the ISO name of the base language,
/// and finally the identifier itself.
pub fn get_language_name(code: &str) -> String {
    if let Some(language) = find_supported_language(code) {
        return language.name.to_string();
    }

    match iso_language(code) {
        Some(language) if base_language(code) == code => language.to_name().to_string(),
        Some(language) => format!("{} ({})", language.to_name(), &code[base_language(code).len() + 1..]),
        None => code.to_string(),
    }
}
