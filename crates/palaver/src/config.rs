//! Application configuration.

use palaver_core::observability::LogFormat;
use palaver_error::{ConfigError, ConfigErrorKind, PalaverResult};
use palaver_models::{BackendKind, InferenceConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Environment variable selecting the backend.
const ENV_BACKEND: &str = "PALAVER_BACKEND";
/// Environment variable for the Bedrock runtime endpoint.
const ENV_ENDPOINT: &str = "PALAVER_ENDPOINT";
/// Environment variable for the endpoint bearer token.
const ENV_API_KEY: &str = "PALAVER_API_KEY";
/// Environment variable for the per-call timeout in seconds.
const ENV_TIMEOUT_SECS: &str = "PALAVER_TIMEOUT_SECS";
/// Environment variable for the mock backend's text.
const ENV_MOCK_TEXT: &str = "PALAVER_MOCK_TEXT";

/// The `[logging]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Line format
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Human,
            filter: "info".to_string(),
        }
    }
}

/// Top-level `palaver.toml`.
///
/// ```
/// use palaver::{BackendKind, LogFormat, PalaverConfig};
///
/// let config = PalaverConfig::from_toml(
///     r#"
///     [inference]
///     backend = "mock"
///
///     [logging]
///     format = "json"
///     "#,
/// )
/// .expect("valid config");
///
/// assert_eq!(config.inference.backend, BackendKind::Mock);
/// assert_eq!(config.logging.format, LogFormat::Json);
/// assert_eq!(config.logging.filter, "info");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalaverConfig {
    /// Inference backend settings
    pub inference: InferenceConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl PalaverConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> PalaverResult<Self> {
        Ok(toml::from_str(content)
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse(e.to_string())))?)
    }

    /// Loads configuration from a TOML file.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> PalaverResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(ConfigErrorKind::Read(e.to_string())))?;
        Self::from_toml(&content)
    }

    /// Loads the file if one is given, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> PalaverResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `PALAVER_*` overrides read through `lookup`.
    ///
    /// ```
    /// use palaver::{BackendKind, PalaverConfig};
    ///
    /// let mut config = PalaverConfig::default();
    /// config
    ///     .apply_overrides(|key| match key {
    ///         "PALAVER_BACKEND" => Some("mock".to_string()),
    ///         "PALAVER_MOCK_TEXT" => Some("pong".to_string()),
    ///         _ => None,
    ///     })
    ///     .expect("valid overrides");
    ///
    /// assert_eq!(config.inference.backend, BackendKind::Mock);
    /// assert_eq!(config.inference.mock.text, "pong");
    /// ```
    pub fn apply_overrides<F>(&mut self, lookup: F) -> PalaverResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let inference = &mut self.inference;

        if let Some(backend) = lookup(ENV_BACKEND) {
            inference.backend = BackendKind::from_str(&backend)
                .map_err(|_| ConfigError::invalid_value(ENV_BACKEND, &backend, "bedrock or mock"))?;
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            inference.endpoint = endpoint;
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            inference.api_key = Some(api_key);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            inference.timeout_secs = timeout
                .parse()
                .map_err(|_| ConfigError::invalid_value(ENV_TIMEOUT_SECS, &timeout, "whole seconds"))?;
        }
        if let Some(text) = lookup(ENV_MOCK_TEXT) {
            inference.mock.text = text;
        }

        tracing::debug!(backend = %inference.backend, "Applied environment overrides");
        Ok(())
    }
}
