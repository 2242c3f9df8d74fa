//! Where Essspace looks for its config files, and how the layers combine.
//!
//! The user file (`config.toml` in the config directory) is read first, then
//! `essspace.toml` in the working directory. A section present in the project
//! file replaces that whole section from the user file.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{API_KEY_ENV, ConfigError, EssspaceConfig, Result};

/// Project-local config file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "essspace.toml";

/// User config file inside the config directory.
pub const USER_CONFIG_FILE: &str = "config.toml";

const APP_NAME: &str = "essspace";
const CONFIG_DIR_ENV: &str = "ESSSPACE_CONFIG_DIR";

/// Written above the settings by [`save_config`].
const SAVED_HEADER: &str = "\
# Essspace configuration.
# Prefer the HF_API_KEY environment variable over summarizer.api_key.

";

// ─────────────────────────────────────────────────────────────────────────────
// Layers
// ─────────────────────────────────────────────────────────────────────────────

/// Which of the two config files a layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigLayer {
    User,
    Project,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::User => "user",
            Self::Project => "project",
        })
    }
}

/// A config file that was read and merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerFile {
    pub layer: ConfigLayer,
    pub path: PathBuf,
}

/// The merged configuration plus what went into it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: EssspaceConfig,
    /// Files merged, lowest precedence first. Missing or broken files are absent.
    pub layers: Vec<LayerFile>,
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Path of the file that supplied `layer`, if it was merged.
    pub fn path_of(&self, layer: ConfigLayer) -> Option<&Path> {
        self.layers
            .iter()
            .find(|file| file.layer == layer)
            .map(|file| file.path.as_path())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Read the user and project files and merge them over the defaults.
///
/// `project_dir` defaults to the working directory. `config_dir` replaces the
/// directory from [`xdg_config_dir`]. A file that cannot be read or parsed is
/// skipped with a warning so one bad file never blocks the CLI.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let project_path = match project_dir {
        Some(dir) => dir.join(PROJECT_CONFIG_FILE),
        None => PathBuf::from(PROJECT_CONFIG_FILE),
    };
    let candidates = [
        (ConfigLayer::User, user_config_path(config_dir)),
        (ConfigLayer::Project, Some(project_path)),
    ];

    let mut loaded = LoadedConfig {
        config: EssspaceConfig::new(),
        layers: Vec::new(),
        warnings: Vec::new(),
    };

    for (layer, path) in candidates {
        let Some(path) = path else { continue };
        match read_layer(&path) {
            Ok(Some(overlay)) => {
                loaded.config.merge(overlay);
                loaded.layers.push(LayerFile { layer, path });
            }
            Ok(None) => {}
            Err(e) => loaded
                .warnings
                .push(format!("Skipped {layer} config {}: {e}", path.display())),
        }
    }

    if loaded.config.summarizer().has_plaintext_api_key() {
        loaded.warnings.push(format!(
            "[summarizer] api_key is stored in plaintext; set {API_KEY_ENV} instead"
        ));
    }

    Ok(loaded)
}

/// Parse one config file. A missing file is `Ok(None)`.
fn read_layer(path: &Path) -> Result<Option<EssspaceConfig>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    EssspaceConfig::from_toml(&text).map(Some)
}

/// Write `config` to `path` with a short header, creating parent directories.
pub fn save_config(config: &EssspaceConfig, path: &Path) -> Result<()> {
    let body = config.to_toml()?;
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, format!("{SAVED_HEADER}{body}")).map_err(io_error)
}

// ─────────────────────────────────────────────────────────────────────────────
// Directories
// ─────────────────────────────────────────────────────────────────────────────

/// Config directory: `$ESSSPACE_CONFIG_DIR` if set, else the platform one.
pub fn xdg_config_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join(APP_NAME)))
}

/// The user config file, under `config_dir` when given.
pub fn user_config_path(config_dir: Option<&Path>) -> Option<PathBuf> {
    match config_dir {
        Some(dir) => Some(dir.to_path_buf()),
        None => xdg_config_dir(),
    }
    .map(|dir| dir.join(USER_CONFIG_FILE))
}

/// Directory holding the database and captured media by default.
///
/// Falls back to `./.essspace` when the platform has no data directory.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(".essspace"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::SummaryMode;

    /// Load with `project` as the working directory and `user` as the config dir.
    fn load(project: &TempDir, user: &TempDir) -> LoadedConfig {
        load_config_with_options(Some(project.path()), Some(user.path())).unwrap()
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let (project, user) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let loaded = load(&project, &user);

        assert_eq!(loaded.config, EssspaceConfig::new());
        assert!(loaded.layers.is_empty());
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_project_section_replaces_user_section() {
        let (project, user) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        fs::write(
            user.path().join(USER_CONFIG_FILE),
            "[ocr]\nlanguage = \"fra\"\n\n[summarizer]\nmode = \"cloud\"\n",
        )
        .unwrap();
        fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            "[summarizer]\nmode = \"on_device\"\n",
        )
        .unwrap();

        let loaded = load(&project, &user);

        assert_eq!(loaded.config.summarizer().mode, SummaryMode::OnDevice);
        assert_eq!(loaded.config.ocr().language, "fra");
        assert_eq!(
            loaded.path_of(ConfigLayer::User),
            Some(user.path().join(USER_CONFIG_FILE).as_path())
        );
        assert_eq!(loaded.layers[1].layer, ConfigLayer::Project);
    }

    #[test]
    fn test_plaintext_key_warns() {
        let (project, user) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            "[summarizer]\napi_key = \"hf_secret\"\n",
        )
        .unwrap();

        let loaded = load(&project, &user);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("plaintext"));
        assert!(loaded.warnings[0].contains("HF_API_KEY"));
    }

    #[test]
    fn test_broken_file_is_skipped_with_warning() {
        let (project, user) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        fs::write(user.path().join(USER_CONFIG_FILE), "[ocr]\nlanguage = \"deu\"\n").unwrap();
        fs::write(project.path().join(PROJECT_CONFIG_FILE), "[storage\n").unwrap();

        let loaded = load(&project, &user);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].starts_with("Skipped project config"));
        assert_eq!(loaded.config.ocr().language, "deu");
        assert!(loaded.path_of(ConfigLayer::Project).is_none());
    }

    #[test]
    fn test_read_layer_missing_and_unreadable() {
        let dir = TempDir::new().unwrap();
        assert!(read_layer(&dir.path().join("absent.toml")).unwrap().is_none());

        // A directory exists but cannot be read as a file.
        let err = read_layer(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_save_writes_header_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(USER_CONFIG_FILE);

        let config = EssspaceConfig::with_all_defaults();
        save_config(&config, &path).unwrap();

        assert!(fs::read_to_string(&path).unwrap().starts_with("# Essspace configuration."));
        assert_eq!(read_layer(&path).unwrap(), Some(config));
    }

    #[test]
    fn test_user_config_path_prefers_explicit_dir() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            user_config_path(Some(dir.path())),
            Some(dir.path().join(USER_CONFIG_FILE))
        );
    }
}
