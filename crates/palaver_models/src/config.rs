//! Inference backend configuration.

use crate::{BedrockRuntimeBackend, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, MockBackend};
use palaver_error::{ConfigError, ConfigErrorKind, PalaverResult};
use palaver_interface::InferenceBackend;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Bedrock runtime endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://bedrock-runtime.us-east-1.amazonaws.com";

/// Inference timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which backend serves inference calls.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendKind {
    /// HTTP calls to a Bedrock runtime endpoint
    #[default]
    Bedrock,
    /// Fixed text, no network
    Mock,
}

/// Settings for the mock backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    /// Text every call answers with
    pub text: String,
    /// Delay before answering, in milliseconds
    pub delay_ms: u64,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            text: "This is a mock response.".to_string(),
            delay_ms: 0,
        }
    }
}

/// The `[inference]` table.
///
/// Every field has a default, so an empty table is valid.
///
/// ```
/// use palaver_models::{BackendKind, InferenceConfig};
///
/// let config: InferenceConfig = toml::from_str(
///     r#"
///     backend = "mock"
///     timeout_secs = 5
///
///     [mock]
///     text = "pong"
///     "#,
/// )
/// .expect("valid table");
///
/// assert_eq!(config.backend, BackendKind::Mock);
/// assert_eq!(config.mock.text, "pong");
/// assert_eq!(config.default_max_tokens, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Backend selection
    pub backend: BackendKind,
    /// Bedrock runtime base URL
    pub endpoint: String,
    /// Bearer token for the endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Mock backend settings
    pub mock: MockSettings,
    /// Temperature when neither conversation nor config set one
    pub default_temperature: f64,
    /// Max tokens when neither conversation nor config set one
    pub default_max_tokens: u32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mock: MockSettings::default(),
            default_temperature: DEFAULT_TEMPERATURE,
            default_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl InferenceConfig {
    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Builds the configured backend.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the HTTP client cannot be constructed.
#[tracing::instrument(skip(config), fields(backend = %config.backend))]
pub fn build_backend(config: &InferenceConfig) -> PalaverResult<Arc<dyn InferenceBackend>> {
    let backend: Arc<dyn InferenceBackend> = match config.backend {
        BackendKind::Bedrock => {
            let client = reqwest::Client::builder()
                .timeout(config.timeout())
                .build()
                .map_err(|e| ConfigError::new(ConfigErrorKind::HttpClient(e.to_string())))?;
            Arc::new(
                BedrockRuntimeBackend::new(config.endpoint.clone(), config.api_key.clone())
                    .with_client(client),
            )
        }
        BackendKind::Mock => {
            let mut mock = MockBackend::new(config.mock.text.clone());
            if config.mock.delay_ms > 0 {
                mock = mock.with_delay(Duration::from_millis(config.mock.delay_ms));
            }
            Arc::new(mock)
        }
    };

    tracing::info!(backend = backend.name(), "Inference backend ready");
    Ok(backend)
}
