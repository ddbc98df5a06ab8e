use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::errors::AppError;
use crate::providers::ChatProvider;
use crate::session::{LanguageRunSummary, SessionState, TranslationSettings};
use crate::translation::{BatchTranslator, TokenUsageStats, TranslationResult, TranslationService, build_requests};

/// Application controller for translating one catalog
///
/// The controller owns the session state and replaces it with the result of
/// a pure transition after every step. Only one language is translated at a
/// time.
#[derive(Debug)]
pub struct Controller<P> {
    state: SessionState,
    translator: BatchTranslator<P>,
}

impl<P: ChatProvider> Controller<P> {
    /// Create a controller using the settings' model
    pub fn new(provider: P, settings: TranslationSettings) -> Self {
        let service = TranslationService::new(provider, settings.model.clone());
        Self::with_translator(BatchTranslator::new(service), settings)
    }

    /// Create a controller around a configured batch translator
    pub fn with_translator(translator: BatchTranslator<P>, settings: TranslationSettings) -> Self {
        Self {
            state: SessionState::new(settings),
            translator,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Token usage accumulated by every run so far
    pub fn token_usage(&self) -> TokenUsageStats {
        self.translator.service().token_usage()
    }

    /// Apply a pure state transition
    pub fn update(&mut self, transition: impl FnOnce(SessionState) -> SessionState) {
        self.state = transition(std::mem::take(&mut self.state));
    }

    /// Load catalog text into the session
    pub fn load_catalog(&mut self, json: &str) -> Result<(), AppError> {
        let state = std::mem::take(&mut self.state);
        match state.clone().load_catalog(json) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(e) => {
                self.state = state;
                Err(e.into())
            }
        }
    }

    /// Translate the catalog into one language
    pub async fn translate_language(&mut self, code: &str, force_refresh: bool) -> Result<LanguageRunSummary, AppError> {
        self.translate_language_with_progress(code, force_refresh, |_, _| {}).await
    }

    /// Translate the catalog into one language, reporting `(completed, total)`
    ///
    /// By default only strings without a translation for `code` are sent;
    /// `force_refresh` sends every eligible string again.
    pub async fn translate_language_with_progress(
        &mut self,
        code: &str,
        force_refresh: bool,
        on_progress: impl Fn(usize, usize),
    ) -> Result<LanguageRunSummary, AppError> {
        if self.state.is_translating {
            return Err(AppError::TranslationInProgress);
        }
        if self.state.catalog.is_none() {
            return Err(AppError::Config("No catalog loaded".to_string()));
        }
        if code == self.state.source_language {
            warn!("Skipping {}: it is the catalog's source language", code);
            return Ok(LanguageRunSummary::nothing_to_do(code));
        }

        self.update(|s| s.begin_translation(code));

        let strings: Vec<_> = self
            .state
            .translatable_strings()
            .into_iter()
            .filter(|s| force_refresh || !s.is_translated_into(code))
            .collect();

        if strings.is_empty() {
            info!("Nothing to translate for {}", code);
            self.update(|s| s.end_translation(code));
            return Ok(LanguageRunSummary::nothing_to_do(code));
        }

        let requests = build_requests(&strings, code, self.state.settings.app_context());
        debug!("Built {} requests for {}", requests.len(), code);

        let run = Mutex::new(RunGuard::new(&mut self.state, code));
        let results = self
            .translator
            .translate_language(&requests, |completed, total| {
                run.lock().update(|s| s.record_progress(code, completed, total));
                on_progress(completed, total);
            })
            .await;

        let failed = results.iter().filter(|r| !r.success).count();
        run.into_inner().finish(&results);

        if failed > 0 {
            warn!("{} of {} strings failed for {}", failed, requests.len(), code);
        }

        Ok(LanguageRunSummary {
            language_code: code.to_string(),
            requested: requests.len(),
            translated: results.len() - failed,
            failed,
        })
    }

    /// Translate into each language in turn, skipping the source language
    pub async fn translate_languages(&mut self, codes: &[String], force_refresh: bool) -> Result<Vec<LanguageRunSummary>, AppError> {
        let mut summaries = Vec::with_capacity(codes.len());
        for code in codes {
            if *code == self.state.source_language {
                continue;
            }
            summaries.push(self.translate_language(code, force_refresh).await?);
        }
        Ok(summaries)
    }

    /// Merged catalog as text
    pub fn output_json(&self) -> Result<String, AppError> {
        self.state
            .output_json()
            .map_err(|e| AppError::Catalog(e.into()))
    }
}

/// Session access for one running language
///
/// A run whose future is dropped before it completes is marked failed
/// instead of leaving the session stuck in `is_translating`.
struct RunGuard<'a> {
    state: &'a mut SessionState,
    code: &'a str,
    finished: bool,
}

impl<'a> RunGuard<'a> {
    fn new(state: &'a mut SessionState, code: &'a str) -> Self {
        Self {
            state,
            code,
            finished: false,
        }
    }

    fn update(&mut self, transition: impl FnOnce(SessionState) -> SessionState) {
        *self.state = transition(std::mem::take(&mut *self.state));
    }

    fn finish(mut self, results: &[TranslationResult]) {
        let code = self.code;
        self.update(|s| s.apply_results(code, results));
        self.finished = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let code = self.code;
        warn!("Translation run for {} was interrupted", code);
        self.update(|s| s.fail_translation(code, "Translation interrupted"));
    }
}
