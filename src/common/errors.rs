//! Error types for the application

use thiserror::Error;

/// Result type alias using our PolyfundError
pub type Result<T> = std::result::Result<T, PolyfundError>;

/// Main error type for the I/O edges of the allocator
///
/// The filter and the allocation engine never return errors; only
/// configuration loading, file loading and the market discovery client do.
#[derive(Error, Debug)]
pub enum PolyfundError {
    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Invalid request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Event or market not found
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
