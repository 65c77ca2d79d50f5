//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Semantic Scholar API key.
pub const SEMANTIC_SCHOLAR_KEY_VAR: &str = "SEMANTIC_SCHOLAR_API_KEY";

/// Environment variable holding the SerpAPI key.
pub const SERPAPI_KEY_VAR: &str = "SERPAPI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API keys for the upstream services
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

/// Credentials for the upstream search services.
///
/// Keys are read-only once loaded and shared across every call of a
/// traversal; a missing key surfaces as a [`ConfigError`] when the matching
/// adapter is selected, before any network call is attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeys {
    /// Semantic Scholar API key (paper search)
    #[serde(default)]
    pub semantic_scholar: Option<String>,

    /// SerpAPI key (author profiles)
    #[serde(default)]
    pub serpapi: Option<String>,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            semantic_scholar: std::env::var(SEMANTIC_SCHOLAR_KEY_VAR).ok(),
            serpapi: std::env::var(SERPAPI_KEY_VAR).ok(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Configuration errors, all fatal before any network call
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A selected adapter's credential is not configured
    #[error("missing credential for {service}: set {env_var}")]
    MissingCredential {
        /// Human-readable service name
        service: &'static str,
        /// Environment variable to set
        env_var: &'static str,
    },

    /// No adapter is registered under the requested id
    #[error("unknown source: {0}")]
    UnknownSource(String),

    /// The configuration file could not be loaded or deserialized
    #[error(transparent)]
    File(#[from] config::ConfigError),
}

/// Load configuration from a file, layered with `CITEHARVEST_`-prefixed
/// environment variables
pub fn load_config(path: &PathBuf) -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("CITEHARVEST").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Get the default configuration (credentials from the environment)
pub fn get_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_http_config() {
        let config = Config::default();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 10);
    }

    #[test]
    fn test_missing_credential_message_names_env_var() {
        let err = ConfigError::MissingCredential {
            service: "Semantic Scholar",
            env_var: SEMANTIC_SCHOLAR_KEY_VAR,
        };
        assert!(err.to_string().contains("SEMANTIC_SCHOLAR_API_KEY"));
    }
}
