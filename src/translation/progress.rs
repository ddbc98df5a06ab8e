/*!
 * Merging translation results into a catalog and per-language progress.
 *
 * Progress is always recomputed from the catalog, the exclusion set and the
 * language list; it is never patched in place.
 */

use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::catalog::Catalog;
use crate::language_utils::get_language_name;

use super::request::TranslationResult;

/// Completion counts for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageProgress {
    pub language_code: String,
    pub language_name: String,
    pub total_strings: usize,
    pub translated_strings: usize,
    pub failed_strings: usize,
    pub in_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LanguageProgress {
    fn new(language_code: &str, total_strings: usize, translated_strings: usize) -> Self {
        Self {
            language_code: language_code.to_string(),
            language_name: get_language_name(language_code),
            total_strings,
            translated_strings,
            failed_strings: 0,
            in_progress: false,
            error: None,
        }
    }

    /// Share of translated strings, 0-100; an empty language counts as done
    pub fn percentage(&self) -> f64 {
        if self.total_strings == 0 {
            100.0
        } else {
            self.translated_strings as f64 * 100.0 / self.total_strings as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.translated_strings >= self.total_strings
    }
}

/// Progress for each of `languages`
///
/// Totals count translatable, non-excluded strings. The source language is
/// always fully translated.
pub fn calculate_progress(
    catalog: &Catalog,
    languages: &[String],
    excluded: &HashSet<String>,
) -> BTreeMap<String, LanguageProgress> {
    let strings = catalog.translatable_strings(excluded);
    let total = strings.len();

    languages
        .iter()
        .map(|code| {
            let translated = if code == catalog.source_language() {
                total
            } else {
                strings.iter().filter(|s| s.is_translated_into(code)).count()
            };
            (code.clone(), LanguageProgress::new(code, total, translated))
        })
        .collect()
}

/// Catalog after a merge plus what happened to each result
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub catalog: Catalog,
    pub applied: usize,
    pub failed: usize,
}

/// Write every successful result into a copy of `catalog`
///
/// Unsuccessful results are counted as failed and leave the catalog alone.
pub fn apply_results(catalog: &Catalog, results: &[TranslationResult]) -> MergeOutcome {
    let mut updated = catalog.clone();
    let mut applied = 0;
    let mut failed = 0;

    for result in results {
        if result.success {
            updated.set_translation(&result.string_key, &result.target_language_code, &result.translated_text);
            applied += 1;
        } else {
            failed += 1;
        }
    }

    debug!("Merged {} translations, {} failed", applied, failed);
    MergeOutcome {
        catalog: updated,
        applied,
        failed,
    }
}
