//! API key resolution.
//!
//! Resolution order:
//! 1. Environment variable (`HF_API_KEY`)
//! 2. Config file (with warning at load time)

/// Environment variable holding the summarization API key.
pub const API_KEY_ENV: &str = "HF_API_KEY";

/// Result of API key resolution with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value.
    pub value: String,
    /// Where the secret was found.
    pub source: SecretSource,
}

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file (plaintext, not recommended).
    ConfigFile,
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {}", var),
            SecretSource::ConfigFile => write!(f, "config file (plaintext)"),
        }
    }
}

/// Resolve the summarization API key from the environment, then the config value.
pub fn resolve_api_key(config_value: Option<&str>) -> Option<ResolvedSecret> {
    resolve_from(std::env::var(API_KEY_ENV).ok(), config_value)
}

fn resolve_from(env_value: Option<String>, config_value: Option<&str>) -> Option<ResolvedSecret> {
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return Some(ResolvedSecret {
            value,
            source: SecretSource::EnvVar(API_KEY_ENV.to_string()),
        });
    }

    config_value
        .filter(|v| !v.trim().is_empty())
        .map(|v| ResolvedSecret {
            value: v.to_string(),
            source: SecretSource::ConfigFile,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_wins_over_config() {
        let resolved = resolve_from(Some("env-key".to_string()), Some("file-key")).unwrap();
        assert_eq!(resolved.value, "env-key");
        assert_eq!(resolved.source, SecretSource::EnvVar("HF_API_KEY".to_string()));
    }

    #[test]
    fn test_falls_back_to_config_value() {
        let resolved = resolve_from(None, Some("file-key")).unwrap();
        assert_eq!(resolved.value, "file-key");
        assert_eq!(resolved.source, SecretSource::ConfigFile);

        let resolved = resolve_from(Some(String::new()), Some("file-key")).unwrap();
        assert_eq!(resolved.source, SecretSource::ConfigFile);
    }

    #[test]
    fn test_blank_values_resolve_to_none() {
        assert!(resolve_from(None, None).is_none());
        assert!(resolve_from(Some("  ".to_string()), Some("")).is_none());
    }

    #[test]
    fn test_secret_source_display() {
        assert_eq!(
            SecretSource::EnvVar("HF_API_KEY".to_string()).to_string(),
            "env var HF_API_KEY"
        );
        assert_eq!(SecretSource::ConfigFile.to_string(), "config file (plaintext)");
    }
}
