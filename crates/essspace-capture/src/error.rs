//! Error types for the capture crate.

use thiserror::Error;

/// Result type alias for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Errors that can occur while capturing or recognizing images.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Frame geometry does not match its buffer.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Image decoding or encoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem operation failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The OCR engine failed or could not be started.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// The OCR engine did not finish in time.
    #[error("OCR timed out after {0}s")]
    OcrTimeout(u64),

    /// The frame source has nothing to deliver.
    #[error("Frame source error: {0}")]
    Source(String),

    /// A blocking task panicked or was cancelled.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CaptureError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<tokio::task::JoinError> for CaptureError {
    fn from(err: tokio::task::JoinError) -> Self {
        CaptureError::Internal(format!("blocking task failed: {}", err))
    }
}
