//! Configuration system for Essspace.
//!
//! Provides TOML-based configuration with:
//! - `[storage]`, `[capture]`, `[ocr]` and `[summarizer]` sections, each optional
//! - Config file layering (XDG user config + project-local overrides)
//! - API key resolution (env var → config file)

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod types;

pub use discovery::{
    ConfigLayer, LayerFile, LoadedConfig, PROJECT_CONFIG_FILE, USER_CONFIG_FILE, data_dir,
    load_config_with_options, save_config, user_config_path, xdg_config_dir,
};
pub use error::{ConfigError, Result};
pub use secrets::{API_KEY_ENV, ResolvedSecret, SecretSource, resolve_api_key};
pub use types::*;
