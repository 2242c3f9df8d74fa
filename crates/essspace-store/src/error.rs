//! Error types for the store crate.

use thiserror::Error;

/// Errors that can occur in the store crate.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization of a JSON column failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Could not create the directory holding the database file.
    #[error("Failed to create store directory '{path}': {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    /// Requested note not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Schema migration failed.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Invalid data or state.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
