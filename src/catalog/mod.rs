/*!
 * Xcode string catalog (`.xcstrings`) model.
 *
 * A catalog is kept as the parsed JSON document so that fields this crate
 * does not interpret (`extractionState`, `variations`, unknown keys) and the
 * original key order survive a round trip. Typed views are produced on read.
 * Every update returns a new `Catalog`; the receiver is never modified.
 */

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::errors::CatalogError;

pub mod format;
pub mod placeholders;

pub use self::format::{JsonStyle, OutputFormat};
pub use self::placeholders::{extract_placeholders, has_placeholders};

/// State written for translations produced by this tool
pub const TRANSLATED_STATE: &str = "translated";

/// A `stringUnit` inside a localization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringUnit {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub value: String,
}

/// One language's localization of a catalog entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    #[serde(default)]
    pub string_unit: Option<StringUnit>,
}

/// Read-only view of one catalog entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringEntry {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub should_translate: Option<bool>,
    #[serde(default)]
    pub localizations: BTreeMap<String, Localization>,
}

impl StringEntry {
    /// Absent or `true` means the entry is eligible for translation
    pub fn is_translatable(&self) -> bool {
        self.should_translate.unwrap_or(true)
    }

    /// Non-empty `stringUnit.value` for a language
    pub fn value_for(&self, language: &str) -> Option<&str> {
        self.localizations
            .get(language)
            .and_then(|l| l.string_unit.as_ref())
            .map(|u| u.value.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// A source-language entry eligible for translation
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatableString {
    /// Catalog key, unique within one catalog
    pub key: String,
    /// Source-language text, never blank
    pub source_text: String,
    /// Developer comment for translators
    pub comment: Option<String>,
    /// Placeholder tokens found in the source text
    pub placeholders: Vec<String>,
    /// Existing translations by language code, source language excluded
    pub existing_translations: BTreeMap<String, String>,
}

impl TranslatableString {
    /// Whether a non-empty translation already exists for `language`
    pub fn is_translated_into(&self, language: &str) -> bool {
        self.existing_translations.contains_key(language)
    }
}

/// Parsed string catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    document: Map<String, Value>,
    source_language: String,
    format: OutputFormat,
}

impl Catalog {
    /// Parse and validate catalog text
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(document) = value else {
            return Err(CatalogError::NotAnObject);
        };

        let source_language = match document.get("sourceLanguage") {
            Some(Value::String(lang)) if !lang.is_empty() => lang.clone(),
            _ => return Err(CatalogError::InvalidSourceLanguage),
        };

        if !matches!(document.get("strings"), Some(Value::Object(_))) {
            return Err(CatalogError::InvalidStrings);
        }

        match document.get("version") {
            None | Some(Value::Null) => return Err(CatalogError::MissingVersion),
            Some(Value::String(v)) if v.is_empty() => return Err(CatalogError::MissingVersion),
            _ => {}
        }

        Ok(Self {
            document,
            source_language,
            format: OutputFormat::detect(text),
        })
    }

    /// Language the catalog's keys are written in
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Catalog format version, rendered as text
    pub fn version(&self) -> String {
        match self.document.get("version") {
            Some(Value::String(v)) => v.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    /// Number of entries in the catalog
    pub fn len(&self) -> usize {
        self.strings().map_or(0, Map::len)
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the catalog contains `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.strings().is_some_and(|s| s.contains_key(key))
    }

    /// Typed view of one entry
    pub fn entry(&self, key: &str) -> Option<StringEntry> {
        self.strings()
            .and_then(|s| s.get(key))
            .map(|value| read_entry(key, value))
    }

    /// Typed views of all entries in document order
    pub fn entries(&self) -> impl Iterator<Item = (&str, StringEntry)> + '_ {
        self.strings()
            .into_iter()
            .flat_map(|s| s.iter())
            .map(|(key, value)| (key.as_str(), read_entry(key, value)))
    }

    /// Source language plus every language with at least one localization, sorted
    pub fn existing_languages(&self) -> Vec<String> {
        let mut languages = BTreeSet::new();
        languages.insert(self.source_language.clone());
        for (_, entry) in self.entries() {
            languages.extend(entry.localizations.into_keys());
        }
        languages.into_iter().collect()
    }

    /// Entries eligible for translation, minus the user's exclusions
    ///
    /// The source text is the source-language value, or the key itself when the
    /// catalog stores none. Entries whose text is blank are skipped.
    pub fn translatable_strings(&self, excluded: &HashSet<String>) -> Vec<TranslatableString> {
        self.entries()
            .filter(|(key, entry)| entry.is_translatable() && !excluded.contains(*key))
            .filter_map(|(key, entry)| {
                let source_text = entry
                    .value_for(&self.source_language)
                    .unwrap_or(key)
                    .to_string();
                if source_text.trim().is_empty() {
                    return None;
                }

                let existing_translations = entry
                    .localizations
                    .iter()
                    .filter(|(lang, _)| **lang != self.source_language)
                    .filter_map(|(lang, _)| {
                        entry.value_for(lang).map(|v| (lang.clone(), v.to_string()))
                    })
                    .collect();

                Some(TranslatableString {
                    key: key.to_string(),
                    placeholders: extract_placeholders(&source_text),
                    source_text,
                    comment: entry.comment.clone(),
                    existing_translations,
                })
            })
            .collect()
    }

    /// Copy of this catalog with one translation set
    ///
    /// Unknown keys leave the copy unchanged.
    pub fn with_translation(&self, key: &str, language: &str, text: &str) -> Self {
        let mut updated = self.clone();
        updated.set_translation(key, language, text);
        updated
    }

    /// Copy of this catalog with every localization for `language` removed
    ///
    /// The source language cannot be removed; asking for it returns an unchanged copy.
    pub fn without_language(&self, language: &str) -> Self {
        let mut updated = self.clone();
        if language == self.source_language {
            return updated;
        }
        for localizations in updated.localization_maps_mut() {
            localizations.shift_remove(language);
        }
        updated
    }

    /// Copy of this catalog keeping only source-language localizations
    pub fn without_languages_except_source(&self) -> Self {
        let mut updated = self.clone();
        let source = self.source_language.clone();
        for localizations in updated.localization_maps_mut() {
            localizations.retain(|lang, _| *lang == source);
        }
        updated
    }

    /// Serialize using the layout detected at parse time
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        self.format.write(&Value::Object(self.document.clone()))
    }

    /// Serialize using an explicit layout
    pub fn to_json_string_with(&self, format: OutputFormat) -> serde_json::Result<String> {
        format.write(&Value::Object(self.document.clone()))
    }

    /// Set a translation in place; used by the merge step on its own copy
    pub(crate) fn set_translation(&mut self, key: &str, language: &str, text: &str) {
        let Some(Value::Object(entry)) = self.strings_mut().and_then(|s| s.get_mut(key)) else {
            return;
        };

        let localizations = entry
            .entry("localizations")
            .or_insert_with(|| Value::Object(Map::new()));
        if !localizations.is_object() {
            *localizations = Value::Object(Map::new());
        }

        if let Value::Object(map) = localizations {
            let unit = json!({
                "stringUnit": {
                    "state": TRANSLATED_STATE,
                    "value": text,
                }
            });
            insert_sorted(map, language, unit);
        }
    }

    fn strings(&self) -> Option<&Map<String, Value>> {
        self.document.get("strings").and_then(Value::as_object)
    }

    fn strings_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.document.get_mut("strings").and_then(Value::as_object_mut)
    }

    fn localization_maps_mut(&mut self) -> impl Iterator<Item = &mut Map<String, Value>> + '_ {
        self.strings_mut()
            .into_iter()
            .flat_map(|s| s.values_mut())
            .filter_map(|entry| entry.get_mut("localizations"))
            .filter_map(Value::as_object_mut)
    }
}

fn read_entry(key: &str, value: &Value) -> StringEntry {
    StringEntry::deserialize(value).unwrap_or_else(|e| {
        warn!("Ignoring malformed catalog entry '{}': {}", key, e);
        StringEntry::default()
    })
}

/// Insert keeping existing positions; new keys go in sorted position as Xcode does
fn insert_sorted(map: &mut Map<String, Value>, key: &str, value: Value) {
    if let Some(existing) = map.get_mut(key) {
        *existing = value;
        return;
    }

    let mut items: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
    let position = items
        .iter()
        .position(|(k, _)| k.as_str() > key)
        .unwrap_or(items.len());
    items.insert(position, (key.to_string(), value));
    map.extend(items);
}
