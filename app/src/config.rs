//! Configuration management for the Lexdesk client.
//!
//! Loads configuration from environment variables (after an optional `.env`
//! file) with defaults for every field, then validates it.

use lexdesk_http::HttpConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Log levels accepted by [`AppConfig::log_level`]
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },
    /// The loaded configuration is inconsistent
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every service path is joined onto
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Route settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Sign-in page, target of the 401 redirect
    pub sign_in_path: String,
}

/// Durable storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file backing durable storage
    pub path: PathBuf,
}

/// Table defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows per page
    pub default_page_size: usize,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend API
    pub api: ApiConfig,
    /// Routes
    pub routes: RoutesConfig,
    /// Durable storage
    pub storage: StorageConfig,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Table defaults
    pub table: TableConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:4000/api/v1".to_string(),
                timeout_secs: 30,
            },
            routes: RoutesConfig {
                sign_in_path: "/sign-in".to_string(),
            },
            storage: StorageConfig {
                path: PathBuf::from(".lexdesk/storage.json"),
            },
            log_level: "info".to_string(),
            table: TableConfig {
                default_page_size: 10,
            },
        }
    }
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable does not parse or the result
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable does not parse or the result
    /// fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            api: ApiConfig {
                base_url: lookup("LEXDESK_API_BASE_URL").unwrap_or(defaults.api.base_url),
                timeout_secs: parse(&lookup, "LEXDESK_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or(defaults.api.timeout_secs),
            },
            routes: RoutesConfig {
                sign_in_path: lookup("LEXDESK_SIGN_IN_PATH").unwrap_or(defaults.routes.sign_in_path),
            },
            storage: StorageConfig {
                path: lookup("LEXDESK_STORAGE_PATH").map_or(defaults.storage.path, PathBuf::from),
            },
            log_level: lookup("LEXDESK_LOG_LEVEL").unwrap_or(defaults.log_level),
            table: TableConfig {
                default_page_size: parse(&lookup, "LEXDESK_DEFAULT_PAGE_SIZE")?
                    .unwrap_or(defaults.table.default_page_size),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation("api.base_url cannot be empty".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be an http(s) URL, got {base_url}"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation("api.timeout_secs must be > 0".to_string()));
        }
        if !self.routes.sign_in_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "routes.sign_in_path must start with '/'".to_string(),
            ));
        }
        if self.table.default_page_size == 0 {
            return Err(ConfigError::Validation(
                "table.default_page_size must be > 0".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "log_level must be one of {}, got {}",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        Ok(())
    }

    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Settings for the HTTP client
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.api.base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout(),
            sign_in_path: self.routes.sign_in_path.clone(),
        }
    }
}

fn parse<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var, value })
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn variables_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LEXDESK_API_BASE_URL", "https://api.lexdesk.example/v2/"),
            ("LEXDESK_REQUEST_TIMEOUT_SECS", "5"),
            ("LEXDESK_SIGN_IN_PATH", "/login"),
            ("LEXDESK_STORAGE_PATH", "/tmp/lexdesk.json"),
            ("LEXDESK_LOG_LEVEL", "debug"),
            ("LEXDESK_DEFAULT_PAGE_SIZE", "25"),
        ]))
        .unwrap();

        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.routes.sign_in_path, "/login");
        assert_eq!(config.storage.path, PathBuf::from("/tmp/lexdesk.json"));
        assert_eq!(config.table.default_page_size, 25);

        let http = config.http_config();
        assert_eq!(http.base_url, "https://api.lexdesk.example/v2");
        assert_eq!(http.timeout, Duration::from_secs(5));
    }

    #[test]
    fn unparsable_number_is_reported() {
        let error = AppConfig::from_lookup(lookup(&[("LEXDESK_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            error,
            ConfigError::InvalidValue {
                var: "LEXDESK_REQUEST_TIMEOUT_SECS",
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn validation_rejects_bad_values() {
        for vars in [
            [("LEXDESK_API_BASE_URL", "")],
            [("LEXDESK_API_BASE_URL", "ftp://files")],
            [("LEXDESK_REQUEST_TIMEOUT_SECS", "0")],
            [("LEXDESK_SIGN_IN_PATH", "sign-in")],
            [("LEXDESK_DEFAULT_PAGE_SIZE", "0")],
            [("LEXDESK_LOG_LEVEL", "verbose")],
        ] {
            let result = AppConfig::from_lookup(lookup(&vars));
            assert!(
                matches!(result, Err(ConfigError::Validation(_))),
                "{vars:?} should fail validation"
            );
        }
    }
}
