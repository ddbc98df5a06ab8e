/*!
 * Batch translation of catalog strings using a chat-completions provider.
 *
 * - `request`: translation requests, results and the request builder
 * - `prompts`: prompt templates and the structured-output schema
 * - `core`: one batch (or one string) through one model call
 * - `batch`: partitioning and bounded concurrent execution per language
 * - `progress`: merging results into the catalog and progress counts
 */

pub use self::batch::{BATCH_SIZE, BatchTranslator, MAX_CONCURRENT_BATCHES, partition_requests};
pub use self::core::{TokenUsageStats, TranslationService, parse_batch_response, supports_temperature};
pub use self::progress::{LanguageProgress, MergeOutcome, apply_results, calculate_progress};
pub use self::request::{ErrorKind, TranslationFailure, TranslationRequest, TranslationResult, build_requests};

pub mod batch;
pub mod core;
pub mod progress;
pub mod prompts;
pub mod request;
