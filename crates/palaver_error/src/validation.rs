//! Validation error types.

/// An inbound call is missing a required field.
///
/// Validation errors are reported synchronously and never retried.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Description of the missing or invalid field
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver_error::ValidationError;
    ///
    /// let err = ValidationError::new("Conversation id is required");
    /// assert!(err.to_string().contains("Conversation id"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Validation Error: {} at line {} in {}",
            self.message, self.line, self.file
        )
    }
}

impl std::error::Error for ValidationError {}
