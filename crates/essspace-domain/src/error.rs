//! Domain error types.

use essspace_store::NoteId;
use thiserror::Error;

/// Domain-level errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Note not found.
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// A summary was requested for a note with no text.
    #[error("Nothing to summarize")]
    NothingToSummarize,

    /// The caller passed something the operation cannot accept.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage error.
    #[error("Store error: {0}")]
    Store(#[from] essspace_store::StoreError),

    /// Summarizer error.
    #[error("Summarizer error: {0}")]
    Summarize(#[from] essspace_summarize::SummarizeError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for DomainError {
    fn from(err: tokio::task::JoinError) -> Self {
        DomainError::Internal(format!("store task failed: {err}"))
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
