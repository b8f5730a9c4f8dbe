//! Inference backend error types.

/// Specific error conditions for a single inference call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum InferenceErrorKind {
    /// Transport level failure
    #[display("HTTP error: {}", _0)]
    Http(String),

    /// Backend answered with a non-success status
    #[display("Backend error (status {}): {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The call did not complete within the configured timeout
    #[display("inference-timeout after {}ms", millis)]
    Timeout {
        /// Configured timeout in milliseconds
        millis: u64,
    },

    /// The caller went away before the call completed
    #[display("Inference call cancelled")]
    Cancelled,

    /// The response body could not be decoded
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
}

/// Error type for inference calls.
///
/// Inference calls are attempted once; nothing in this crate retries them.
#[derive(Debug, Clone)]
pub struct InferenceError {
    /// The specific error condition
    pub kind: InferenceErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl InferenceError {
    /// Create a new InferenceError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver_error::{InferenceError, InferenceErrorKind};
    ///
    /// let err = InferenceError::new(InferenceErrorKind::Timeout { millis: 1500 });
    /// assert!(err.to_string().contains("inference-timeout"));
    /// ```
    #[track_caller]
    pub fn new(kind: InferenceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Returns true if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, InferenceErrorKind::Timeout { .. })
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Inference Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for InferenceError {}
