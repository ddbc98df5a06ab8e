/*!
 * Batch translation processing.
 *
 * Requests for one language are split into consecutive batches and run
 * through the translation service with a bound on the number of batches in
 * flight. Batches are polled on the caller's task, so results and progress
 * callbacks arrive in completion order.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::providers::ChatProvider;

use super::core::TranslationService;
use super::request::{TranslationRequest, TranslationResult};

/// Maximum number of requests per batch
pub const BATCH_SIZE: usize = 10;

/// Maximum number of batches awaiting a response at once
pub const MAX_CONCURRENT_BATCHES: usize = 10;

/// Split requests into consecutive batches of at most `batch_size`
///
/// Concatenating the batches in order reproduces the input.
pub fn partition_requests(requests: &[TranslationRequest], batch_size: usize) -> Vec<&[TranslationRequest]> {
    requests.chunks(batch_size.max(1)).collect()
}

/// Batch translator for running all requests of one language
#[derive(Debug, Clone)]
pub struct BatchTranslator<P> {
    /// The translation service to use
    service: TranslationService<P>,

    /// Maximum number of requests per batch
    batch_size: usize,

    /// Maximum number of batches in flight
    max_concurrent_batches: usize,
}

impl<P: ChatProvider> BatchTranslator<P> {
    /// Create a batch translator with the default limits
    pub fn new(service: TranslationService<P>) -> Self {
        Self::with_limits(service, BATCH_SIZE, MAX_CONCURRENT_BATCHES)
    }

    /// Create a batch translator with explicit limits (both at least 1)
    pub fn with_limits(service: TranslationService<P>, batch_size: usize, max_concurrent_batches: usize) -> Self {
        Self {
            service,
            batch_size: batch_size.max(1),
            max_concurrent_batches: max_concurrent_batches.max(1),
        }
    }

    pub fn service(&self) -> &TranslationService<P> {
        &self.service
    }

    /// Translate every request and return one result per request
    ///
    /// `on_progress(completed, total)` runs after each batch finishes, with
    /// `completed` grown by that batch's size. Failures never abort the run;
    /// they come back as unsuccessful results.
    pub async fn translate_language(
        &self,
        requests: &[TranslationRequest],
        on_progress: impl Fn(usize, usize),
    ) -> Vec<TranslationResult> {
        let total = requests.len();
        if total == 0 {
            return Vec::new();
        }

        let batches = partition_requests(requests, self.batch_size);
        let batch_count = batches.len();
        debug!(
            "Translating {} strings into {} as {} batches ({} in flight max)",
            total, requests[0].target_language_code, batch_count, self.max_concurrent_batches
        );

        let completed = AtomicUsize::new(0);
        let completed = &completed;
        let on_progress = &on_progress;

        let batch_results: Vec<Vec<TranslationResult>> = stream::iter(batches.into_iter().enumerate())
            .map(|(batch_index, batch)| async move {
                let results = self.service.translate_batch(batch).await;
                let done = completed.fetch_add(batch.len(), Ordering::SeqCst) + batch.len();
                debug!("Batch {}/{} finished ({}/{} strings)", batch_index + 1, batch_count, done, total);
                on_progress(done, total);
                results
            })
            .buffer_unordered(self.max_concurrent_batches)
            .collect()
            .await;

        let results: Vec<TranslationResult> = batch_results.into_iter().flatten().collect();
        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            "Translated {}/{} strings into {}",
            succeeded, total, requests[0].target_language_code
        );
        results
    }
}
