/*!
 * Explicit session state with pure transitions.
 *
 * Every transition consumes the state and returns the next one, so a
 * controller can own a single value and replace it atomically. Progress is
 * recomputed from the catalog after every change to the catalog, the
 * exclusion set or the language selection.
 */

use std::collections::{BTreeMap, HashSet};

use crate::catalog::{Catalog, TranslatableString};
use crate::errors::CatalogError;
use crate::language_utils::DEFAULT_SOURCE_LANGUAGE;
use crate::translation::{LanguageProgress, TranslationResult, apply_results, calculate_progress};

use super::models::{FIRST_STEP, LAST_STEP, TranslationSettings};

/// State of one translation session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Current workflow step, `FIRST_STEP..=LAST_STEP`
    pub step: u8,
    /// Loaded catalog with every merged translation
    pub catalog: Option<Catalog>,
    /// Catalog text as loaded
    pub original_json: String,
    pub source_language: String,
    /// Languages present in the catalog or added by the user
    pub available_languages: Vec<String>,
    /// Languages shown in progress and offered for translation
    pub selected_languages: Vec<String>,
    /// Keys the user excluded from translation
    pub excluded_keys: HashSet<String>,
    pub settings: TranslationSettings,
    pub progress: BTreeMap<String, LanguageProgress>,
    pub is_translating: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(TranslationSettings::default())
    }
}

impl SessionState {
    /// Fresh session with the given settings
    pub fn new(settings: TranslationSettings) -> Self {
        Self {
            step: FIRST_STEP,
            catalog: None,
            original_json: String::new(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            available_languages: Vec::new(),
            selected_languages: Vec::new(),
            excluded_keys: HashSet::new(),
            settings,
            progress: BTreeMap::new(),
            is_translating: false,
        }
    }

    pub fn next_step(self) -> Self {
        let step = (self.step + 1).min(LAST_STEP);
        Self { step, ..self }
    }

    pub fn previous_step(self) -> Self {
        let step = self.step.saturating_sub(1).max(FIRST_STEP);
        Self { step, ..self }
    }

    /// Jump to a step, clamped to the valid range
    pub fn go_to_step(self, step: u8) -> Self {
        Self {
            step: step.clamp(FIRST_STEP, LAST_STEP),
            ..self
        }
    }

    /// Start over, keeping only the settings
    pub fn reset(self) -> Self {
        Self::new(self.settings)
    }

    /// Parse catalog text and select every language it already contains
    pub fn load_catalog(self, json: &str) -> Result<Self, CatalogError> {
        let catalog = Catalog::parse(json)?;
        let languages = catalog.existing_languages();

        Ok(Self {
            original_json: json.to_string(),
            source_language: catalog.source_language().to_string(),
            available_languages: languages.clone(),
            selected_languages: languages,
            catalog: Some(catalog),
            ..self
        }
        .recompute())
    }

    /// Exclude `key` from translation, or include it again
    pub fn toggle_exclusion(mut self, key: &str) -> Self {
        if !self.excluded_keys.remove(key) {
            self.excluded_keys.insert(key.to_string());
        }
        self.recompute()
    }

    /// Exclude every key in `keys`
    pub fn exclude_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_keys.extend(keys.into_iter().map(Into::into));
        self.recompute()
    }

    /// Select a language for translation; no-op when already selected
    pub fn add_language(mut self, code: &str) -> Self {
        if self.selected_languages.iter().any(|l| l == code) {
            return self;
        }
        self.selected_languages.push(code.to_string());
        self.available_languages = self.selected_languages.clone();
        self.recompute()
    }

    /// Deselect a language and strip its localizations from the catalog
    ///
    /// The source language cannot be removed.
    pub fn remove_language(mut self, code: &str) -> Self {
        if code == self.source_language {
            return self;
        }
        self.selected_languages.retain(|l| l != code);
        self.available_languages = self.selected_languages.clone();
        self.catalog = self.catalog.map(|c| c.without_language(code));
        self.recompute()
    }

    /// Keep only the source language, in the selection and in the catalog
    pub fn remove_all_languages(mut self) -> Self {
        let Some(catalog) = self.catalog.take() else {
            return self;
        };
        self.catalog = Some(catalog.without_languages_except_source());
        self.selected_languages = vec![self.source_language.clone()];
        self.available_languages = self.selected_languages.clone();
        self.recompute()
    }

    pub fn with_settings(self, settings: TranslationSettings) -> Self {
        Self { settings, ..self }
    }

    /// Mark a run for `code` as started, selecting the language if needed
    pub fn begin_translation(self, code: &str) -> Self {
        let mut state = self.add_language(code);
        state.is_translating = true;
        if let Some(progress) = state.progress.get_mut(code) {
            progress.in_progress = true;
            progress.error = None;
        }
        state
    }

    /// Reflect `completed` of `total` requests done for a running language
    pub fn record_progress(mut self, code: &str, completed: usize, total: usize) -> Self {
        if let Some(progress) = self.progress.get_mut(code) {
            let remaining = total.saturating_sub(completed);
            progress.translated_strings = progress.total_strings.saturating_sub(remaining);
        }
        self
    }

    /// Merge a finished run into the catalog
    pub fn apply_results(mut self, code: &str, results: &[TranslationResult]) -> Self {
        let Some(catalog) = self.catalog.take() else {
            return self.end_translation(code);
        };

        let outcome = apply_results(&catalog, results);
        self.catalog = Some(outcome.catalog);
        let mut state = self.recompute();
        if let Some(progress) = state.progress.get_mut(code) {
            progress.failed_strings = outcome.failed;
        }
        state.is_translating = false;
        state
    }

    /// Finish a run that produced no results
    pub fn end_translation(mut self, code: &str) -> Self {
        if let Some(progress) = self.progress.get_mut(code) {
            progress.in_progress = false;
        }
        self.is_translating = false;
        self
    }

    /// Finish a run that could not start or complete
    pub fn fail_translation(self, code: &str, message: impl Into<String>) -> Self {
        let mut state = self.end_translation(code);
        if let Some(progress) = state.progress.get_mut(code) {
            progress.error = Some(message.into());
        }
        state
    }

    /// Strings eligible for translation under the current exclusions
    pub fn translatable_strings(&self) -> Vec<TranslatableString> {
        self.catalog
            .as_ref()
            .map(|c| c.translatable_strings(&self.excluded_keys))
            .unwrap_or_default()
    }

    /// Progress for `languages` in code order, or for every selected language when empty
    pub fn progress_for(&self, languages: &[String]) -> Vec<&LanguageProgress> {
        self.progress
            .values()
            .filter(|p| languages.is_empty() || languages.contains(&p.language_code))
            .collect()
    }

    /// Merged catalog as text; empty when nothing is loaded
    pub fn output_json(&self) -> serde_json::Result<String> {
        match &self.catalog {
            Some(catalog) => catalog.to_json_string(),
            None => Ok(String::new()),
        }
    }

    fn recompute(mut self) -> Self {
        if let Some(catalog) = &self.catalog {
            self.progress = calculate_progress(catalog, &self.selected_languages, &self.excluded_keys);
        }
        self
    }
}
