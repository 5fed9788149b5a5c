//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ConsoleConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `api.auth_token`.
pub const TOKEN_ENV: &str = "CERT_CONSOLE_TOKEN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ConsoleConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ConsoleConfig, ConfigError> {
    let mut config: ConsoleConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, std::env::var(TOKEN_ENV).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve configuration for the binary: file when given, defaults otherwise.
pub fn load_or_default(path: Option<&Path>) -> Result<ConsoleConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = ConsoleConfig::default();
            apply_env_overrides(&mut config, std::env::var(TOKEN_ENV).ok());
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

fn apply_env_overrides(config: &mut ConsoleConfig, token: Option<String>) {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        config.api.auth_token = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_token_overrides_file() {
        let mut config = ConsoleConfig::default();
        config.api.auth_token = Some("from-file".to_string());

        apply_env_overrides(&mut config, Some("from-env".to_string()));
        assert_eq!(config.api.auth_token.as_deref(), Some("from-env"));

        apply_env_overrides(&mut config, Some("  ".to_string()));
        assert_eq!(config.api.auth_token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = parse_config("[api]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("api.timeout_secs"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("cert_console_loader_test.toml");
        fs::write(
            &path,
            "[api]\nbase_url = \"http://10.0.0.5:8090\"\npage_size = 50\n\n[retries]\nenabled = false\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8090");
        assert_eq!(config.api.page_size, 50);
        assert!(!config.retries.enabled);

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
