//! Configuration types.
//!
//! Every section is optional in the file. Accessors such as
//! [`EssspaceConfig::ocr`] return the configured section or its defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default OCR binary.
pub const DEFAULT_OCR_COMMAND: &str = "tesseract";
/// Default OCR language.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";
/// Default OCR timeout in seconds.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 30;
/// Longest image side handed to OCR.
pub const DEFAULT_MAX_OCR_IMAGE_SIZE: u32 = 2048;
/// Hugging Face inference API base URL.
pub const DEFAULT_SUMMARIZER_BASE_URL: &str = "https://api-inference.huggingface.co/models";
/// Default summarization model.
pub const DEFAULT_SUMMARIZER_MODEL: &str = "facebook/bart-large-cnn";
/// Default cloud request timeout in seconds.
pub const DEFAULT_SUMMARIZER_TIMEOUT_SECS: u64 = 30;
/// Host probed to decide whether the device is online.
pub const DEFAULT_PROBE_ADDRESS: &str = "api-inference.huggingface.co:443";
/// Connectivity probe timeout in milliseconds.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1500;

// ─────────────────────────────────────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EssspaceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<CaptureConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summarizer: Option<SummarizerConfig>,
}

impl EssspaceConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// A config with every section filled in with defaults, for `config init`.
    pub fn with_all_defaults() -> Self {
        Self {
            storage: Some(StorageConfig::default()),
            capture: Some(CaptureConfig::default()),
            ocr: Some(OcrConfig::default()),
            summarizer: Some(SummarizerConfig::default()),
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: EssspaceConfig) {
        if other.storage.is_some() {
            self.storage = other.storage;
        }

        if other.capture.is_some() {
            self.capture = other.capture;
        }

        if other.ocr.is_some() {
            self.ocr = other.ocr;
        }

        if other.summarizer.is_some() {
            self.summarizer = other.summarizer;
        }
    }

    pub fn storage(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }

    pub fn capture(&self) -> CaptureConfig {
        self.capture.clone().unwrap_or_default()
    }

    pub fn ocr(&self) -> OcrConfig {
        self.ocr.clone().unwrap_or_default()
    }

    pub fn summarizer(&self) -> SummarizerConfig {
        self.summarizer.clone().unwrap_or_default()
    }

    /// Reject values that would make a component unusable.
    pub fn validate(&self) -> Result<()> {
        let ocr = self.ocr();
        if ocr.command.trim().is_empty() {
            return Err(invalid("ocr.command", "must not be empty"));
        }
        if ocr.timeout_secs == 0 {
            return Err(invalid("ocr.timeout_secs", "must be greater than zero"));
        }

        if self.capture().max_ocr_image_size == 0 {
            return Err(invalid("capture.max_ocr_image_size", "must be greater than zero"));
        }

        let summarizer = self.summarizer();
        if !(summarizer.base_url.starts_with("http://")
            || summarizer.base_url.starts_with("https://"))
        {
            return Err(invalid("summarizer.base_url", "must be an http(s) URL"));
        }
        if summarizer.model.trim().is_empty() {
            return Err(invalid("summarizer.model", "must not be empty"));
        }
        if summarizer.timeout_secs == 0 {
            return Err(invalid("summarizer.timeout_secs", "must be greater than zero"));
        }

        Ok(())
    }
}

fn invalid(key: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { key, reason }
}

// ─────────────────────────────────────────────────────────────────────────────
// Storage
// ─────────────────────────────────────────────────────────────────────────────

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file. Default: `<data dir>/essspace/notes.db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

impl StorageConfig {
    pub fn effective_database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| crate::data_dir().join("notes.db"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Capture
// ─────────────────────────────────────────────────────────────────────────────

/// `[capture]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Where screenshot PNGs are written. Default: `<data dir>/essspace/screenshots`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_dir: Option<PathBuf>,
    /// Run OCR on processed screenshots.
    pub ocr_screenshots: bool,
    /// Images are downscaled so neither side exceeds this before OCR.
    pub max_ocr_image_size: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: None,
            ocr_screenshots: true,
            max_ocr_image_size: DEFAULT_MAX_OCR_IMAGE_SIZE,
        }
    }
}

impl CaptureConfig {
    pub fn effective_screenshot_dir(&self) -> PathBuf {
        self.screenshot_dir
            .clone()
            .unwrap_or_else(|| crate::data_dir().join("screenshots"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OCR
// ─────────────────────────────────────────────────────────────────────────────

/// `[ocr]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// OCR executable (looked up on `PATH` unless absolute).
    pub command: String,
    /// Recognition language passed as `-l`.
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_OCR_COMMAND.to_string(),
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_OCR_TIMEOUT_SECS,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Summarizer
// ─────────────────────────────────────────────────────────────────────────────

/// Which summarizer to prefer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
    /// Cloud when online with a key, on-device otherwise.
    #[default]
    Auto,
    OnDevice,
    Cloud,
}

impl std::fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryMode::Auto => write!(f, "auto"),
            SummaryMode::OnDevice => write!(f, "on_device"),
            SummaryMode::Cloud => write!(f, "cloud"),
        }
    }
}

/// `[summarizer]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub mode: SummaryMode,
    /// Inference API key. Prefer the `HF_API_KEY` environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// `host:port` probed to decide whether the device is online.
    pub probe_address: String,
    pub probe_timeout_ms: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            mode: SummaryMode::Auto,
            api_key: None,
            base_url: DEFAULT_SUMMARIZER_BASE_URL.to_string(),
            model: DEFAULT_SUMMARIZER_MODEL.to_string(),
            timeout_secs: DEFAULT_SUMMARIZER_TIMEOUT_SECS,
            probe_address: DEFAULT_PROBE_ADDRESS.to_string(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

impl SummarizerConfig {
    /// Whether an API key is stored in the file itself.
    pub fn has_plaintext_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}
