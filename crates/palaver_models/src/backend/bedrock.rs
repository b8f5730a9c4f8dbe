//! HTTP backend for a Bedrock runtime compatible endpoint.

use async_trait::async_trait;
use palaver_error::{InferenceError, InferenceErrorKind, PalaverResult};
use palaver_interface::InferenceBackend;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, instrument};

/// Posts request bodies to `{endpoint}/model/{model_id}/invoke`.
///
/// Each call is attempted once.
#[derive(Debug, Clone)]
pub struct BedrockRuntimeBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl BedrockRuntimeBackend {
    /// Creates a backend for an endpoint, with an optional bearer token.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        debug!(
            endpoint = %endpoint,
            authenticated = api_key.is_some(),
            "Created Bedrock runtime backend"
        );
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    /// Uses an existing HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Endpoint base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Invoke URL for a model.
    ///
    /// The model id is one percent-encoded path segment, so versioned ids and
    /// inference profile ARNs keep their colons and slashes inside it.
    ///
    /// ```
    /// use palaver_models::BedrockRuntimeBackend;
    ///
    /// let backend = BedrockRuntimeBackend::new("https://example.test/", None);
    /// assert_eq!(
    ///     backend.invoke_url("anthropic.claude-v2:1"),
    ///     "https://example.test/model/anthropic.claude-v2%3A1/invoke"
    /// );
    /// assert_eq!(
    ///     backend.invoke_url("arn:aws:bedrock:us-east-1:123:inference-profile/us.meta.llama3"),
    ///     "https://example.test/model/arn%3Aaws%3Abedrock%3Aus-east-1%3A123%3Ainference-profile%2Fus.meta.llama3/invoke"
    /// );
    /// ```
    pub fn invoke_url(&self, model_id: &str) -> String {
        format!(
            "{}/model/{}/invoke",
            self.endpoint,
            urlencoding::encode(model_id)
        )
    }
}

#[async_trait]
impl InferenceBackend for BedrockRuntimeBackend {
    #[instrument(skip(self, body), fields(backend = "bedrock", model_id = %model_id))]
    async fn invoke(&self, model_id: &str, body: &Value) -> PalaverResult<Value> {
        let url = self.invoke_url(model_id);
        debug!(url = %url, "Sending inference request");

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = ?e, "HTTP request failed");
            InferenceError::new(InferenceErrorKind::Http(format!("Request failed: {}", e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Backend returned an error status");
            return Err(InferenceError::new(InferenceErrorKind::Status {
                status: status.as_u16(),
                message: error_text,
            })
            .into());
        }

        let text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read response body");
            InferenceError::new(InferenceErrorKind::Http(format!(
                "Failed to read body: {}",
                e
            )))
        })?;

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, "Response body is not JSON");
            InferenceError::new(InferenceErrorKind::MalformedResponse(format!(
                "Response body is not JSON: {}",
                e
            )))
        })?;

        debug!(len = text.len(), "Received inference response");
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "bedrock"
    }
}
