//! Text recognition.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::process::Command;
use tracing::debug;

use crate::error::{CaptureError, Result};

/// Recognizes text in an image file.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Return the raw recognized text (possibly empty).
    async fn recognize(&self, image: &Path) -> Result<String>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// A shared recognizer that can be used across tasks.
pub type SharedRecognizer = Arc<dyn TextRecognizer>;

// ─────────────────────────────────────────────────────────────────────────────
// Tesseract
// ─────────────────────────────────────────────────────────────────────────────

/// Runs the `tesseract` binary and reads the text from its stdout.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    command: PathBuf,
    language: String,
    timeout: Duration,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractRecognizer {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            language: "eng".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the binary can be started.
    pub async fn is_available(&self) -> bool {
        match Command::new(&self.command).arg("--version").output().await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: &Path) -> Result<String> {
        let mut cmd = Command::new(&self.command);
        cmd.arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .kill_on_drop(true);

        debug!(
            command = %self.command.display(),
            image = %image.display(),
            language = %self.language,
            "Running OCR"
        );

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| CaptureError::OcrTimeout(self.timeout.as_secs()))?
            .map_err(|e| {
                CaptureError::Ocr(format!(
                    "failed to run {}: {}",
                    self.command.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::Ocr(format!(
                "{} exited with {}: {}",
                self.command.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Static Recognizer
// ─────────────────────────────────────────────────────────────────────────────

/// Returns a fixed result for every image. Used in tests and when OCR is
/// unavailable but the flow should still run.
#[derive(Debug)]
pub struct StaticRecognizer {
    reply: std::result::Result<String, String>,
    seen: Mutex<Vec<PathBuf>>,
}

impl StaticRecognizer {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Images passed to `recognize`, in call order.
    pub fn seen(&self) -> Vec<PathBuf> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl TextRecognizer for StaticRecognizer {
    async fn recognize(&self, image: &Path) -> Result<String> {
        self.seen.lock().push(image.to_path_buf());
        self.reply.clone().map_err(CaptureError::Ocr)
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_ocr_error() {
        let recognizer = TesseractRecognizer::new("/nonexistent/bin/tesseract-xyz");
        assert!(!recognizer.is_available().await);

        let err = recognizer
            .recognize(Path::new("/tmp/whatever.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Ocr(_)));
    }

    #[tokio::test]
    async fn test_static_recognizer_records_calls() {
        let recognizer = StaticRecognizer::text("hello");
        assert_eq!(recognizer.recognize(Path::new("a.png")).await.unwrap(), "hello");
        assert_eq!(recognizer.seen(), vec![PathBuf::from("a.png")]);

        let failing = StaticRecognizer::failing("no engine");
        assert!(failing.recognize(Path::new("b.png")).await.is_err());
    }
}
