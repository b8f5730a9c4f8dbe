//! Inference backend collaborator.

use async_trait::async_trait;
use palaver_error::PalaverResult;

/// Performs one inference call with a provider-specific request body.
///
/// Backends are picked by configuration; the engine never branches on which
/// one it was given.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Send `body` to `model_id` and return the decoded response body.
    async fn invoke(
        &self,
        model_id: &str,
        body: &serde_json::Value,
    ) -> PalaverResult<serde_json::Value>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}
