//! JSON encoding error types.

/// A request body could not be encoded.
///
/// ```
/// use palaver_error::JsonError;
///
/// let err = JsonError::new("Claude request", "missing field `max_tokens`");
/// assert_eq!(err.target, "Claude request");
/// assert!(err.to_string().starts_with("JSON Error: cannot encode Claude request"));
/// ```
#[derive(Debug, Clone)]
pub struct JsonError {
    /// What was being encoded
    pub target: String,
    /// Serializer or builder message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Records an encoding failure at the caller's location.
    #[track_caller]
    pub fn new(target: impl Into<String>, message: impl std::fmt::Display) -> Self {
        let location = std::panic::Location::caller();
        Self {
            target: target.into(),
            message: message.to_string(),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "JSON Error: cannot encode {} ({}) at line {} in {}",
            self.target, self.message, self.line, self.file
        )
    }
}

impl std::error::Error for JsonError {}
