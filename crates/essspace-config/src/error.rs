//! Errors raised while reading, writing or checking configuration.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config file exists but could not be read or written.
    #[error("cannot access config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot render config as TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting parsed but holds an unusable value, e.g. `ocr.timeout_secs = 0`.
    #[error("{key} {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}
