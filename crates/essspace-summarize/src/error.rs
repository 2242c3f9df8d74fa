//! Error types for the summarize crate.

use thiserror::Error;

/// Result type alias using the summarize error type.
pub type Result<T> = std::result::Result<T, SummarizeError>;

/// Error type for summarization.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The inference API answered with an error.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Network/connectivity error.
    #[error("Network error: {0}")]
    Network(String),

    /// No connection, so the cloud summarizer cannot be used.
    #[error("No internet connection for cloud summarizer")]
    Offline,

    /// Configuration error (API key missing, etc.).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The response body could not be understood.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The input cannot be summarized by this summarizer.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for SummarizeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SummarizeError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            SummarizeError::Network(format!("Connection failed: {}", err))
        } else {
            SummarizeError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SummarizeError {
    fn from(err: serde_json::Error) -> Self {
        SummarizeError::Serialization(err.to_string())
    }
}
