//! Schema source and repository configuration.
//!
//! Defaults point at the upstream NCATS Translator ReasonerAPI repository.
//! Override via environment variables or explicit construction for tests.

use std::time::Duration;

use url::Url;

/// Default location of versioned `TranslatorReasonerAPI.yaml` documents.
pub const DEFAULT_SCHEMA_BASE_URL: &str = "https://raw.githubusercontent.com/NCATSTranslator/ReasonerAPI";

/// Default schema fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Where and how to fetch TRAPI schema documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSourceConfig {
    /// Base URL; documents live at `{base_url}/v{version}/TranslatorReasonerAPI.yaml`.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl SchemaSourceConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TRAPI_SCHEMA_BASE_URL` (default: `https://raw.githubusercontent.com/NCATSTranslator/ReasonerAPI`)
    /// - `TRAPI_FETCH_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("TRAPI_SCHEMA_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_SCHEMA_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl("TRAPI_SCHEMA_BASE_URL".to_string(), e.to_string()))?;

        let timeout_secs = match std::env::var("TRAPI_FETCH_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout("TRAPI_FETCH_TIMEOUT_SECS".to_string(), raw))?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }

    /// Configuration pointing at a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            timeout_secs: 5,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Repository behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Upper bound on one schema fetch, applied around the source.
    pub fetch_timeout: Duration,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl From<&SchemaSourceConfig> for RepositoryConfig {
    fn from(config: &SchemaSourceConfig) -> Self {
        Self {
            fetch_timeout: config.timeout(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid timeout for {0}: '{1}' (expected a positive number of seconds)")]
    InvalidTimeout(String, String),
}
