//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the console.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the console.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend API connection settings.
    pub api: ApiConfig,

    /// Retry configuration for backend fetches.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Localization settings.
    pub locale: LocaleConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend (e.g., "http://127.0.0.1:8090").
    pub base_url: String,

    /// Auth token sent in the `Authorization` header.
    pub auth_token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Records requested per page when listing collections.
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8090".to_string(),
            auth_token: None,
            timeout_secs: 10,
            page_size: 500,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    /// Attempts to make per request, honoring `enabled`.
    pub fn attempts(&self) -> u32 {
        if self.enabled {
            self.max_attempts.max(1)
        } else {
            1
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Localization configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LocaleConfig {
    /// Optional TOML catalog layered over the built-in English strings.
    pub catalog_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ConsoleConfig = toml::from_str("[api]\nbase_url = \"https://certs.internal\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://certs.internal");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.retries.max_attempts, 3);
        assert_eq!(config.observability.log_level, "info");
        assert!(config.locale.catalog_path.is_none());
    }

    #[test]
    fn test_disabled_retries_make_one_attempt() {
        let mut retries = RetryConfig::default();
        assert_eq!(retries.attempts(), 3);

        retries.enabled = false;
        assert_eq!(retries.attempts(), 1);

        retries.enabled = true;
        retries.max_attempts = 0;
        assert_eq!(retries.attempts(), 1);
    }
}
