/*!
 * Session state for a translation workflow.
 *
 * This module provides:
 * - The settings and summary value types
 * - `SessionState`, an explicit state object with pure transitions
 */

pub mod models;
pub mod state;

// Re-export main types
pub use models::{DEFAULT_MODEL, FIRST_STEP, LAST_STEP, LanguageRunSummary, TranslationSettings};
pub use state::SessionState;
