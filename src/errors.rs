/*!
 * Error types for the xcstrings-translator crate.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised while reading or validating a string catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The text is not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The top-level value is not a JSON object
    #[error("Invalid XCStrings format: top-level value must be an object")]
    NotAnObject,

    /// `sourceLanguage` is absent, empty or not a string
    #[error("Invalid XCStrings format: missing or invalid sourceLanguage")]
    InvalidSourceLanguage,

    /// `strings` is absent or not an object
    #[error("Invalid XCStrings format: missing or invalid strings object")]
    InvalidStrings,

    /// `version` is absent or empty
    #[error("Invalid XCStrings format: missing version")]
    MissingVersion,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from catalog parsing
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A translation run was requested while another one is active
    #[error("A translation run is already in progress")]
    TranslationInProgress,

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
