//! Lookup failure error types.

/// What kind of record could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NotFoundKind {
    /// Conversation id did not resolve
    #[display("Conversation '{}' not found", _0)]
    Conversation(String),
    /// Conversation configuration id did not resolve
    #[display("Conversation config '{}' not found", _0)]
    Config(String),
    /// Model id did not resolve
    #[display("Model '{}' not found", _0)]
    Model(String),
}

/// A collaborator lookup returned nothing.
#[derive(Debug, Clone)]
pub struct NotFoundError {
    /// The missing record
    pub kind: NotFoundKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver_error::{NotFoundError, NotFoundKind};
    ///
    /// let err = NotFoundError::new(NotFoundKind::Conversation("c-1".to_string()));
    /// assert!(err.to_string().contains("'c-1' not found"));
    /// ```
    #[track_caller]
    pub fn new(kind: NotFoundKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Not Found: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for NotFoundError {}
