//! Deterministic backend for tests and offline runs.

use crate::ProviderAdapter;
use async_trait::async_trait;
use palaver_error::PalaverResult;
use palaver_interface::InferenceBackend;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Answers every call with fixed text, wrapped in the model family's response shape.
///
/// # Examples
///
/// ```
/// use palaver_interface::InferenceBackend;
/// use palaver_models::MockBackend;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let backend = MockBackend::new("Hello");
/// let body = backend
///     .invoke("meta.llama3-8b-instruct-v1:0", &serde_json::json!({}))
///     .await
///     .expect("mock never fails");
/// assert_eq!(body["generation"], "Hello");
/// assert_eq!(backend.calls(), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockBackend {
    text: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Creates a backend that answers immediately.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Waits this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Text returned by every call.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of calls started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn invoke(&self, model_id: &str, _body: &Value) -> PalaverResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        tracing::debug!(model_id = %model_id, "Mock backend answering");
        Ok(ProviderAdapter::for_model(model_id).sample_response(&self.text))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
