//! Prompt compilation error types.

/// Specific error conditions for prompt compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CompileErrorKind {
    /// The context declares no stages at all
    #[display("No stage key provided and no stages found in context")]
    NoStages,
    /// The requested stage key does not match any stage
    #[display("Stage '{}' not found in context", _0)]
    StageNotFound(String),
}

/// Error type for prompt compilation.
///
/// Both kinds are lookup failures, see [`CompileError::is_not_found`].
#[derive(Debug, Clone)]
pub struct CompileError {
    /// The specific error condition
    pub kind: CompileErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CompileError {
    /// Create a new CompileError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CompileErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Returns true when the failure means "no such stage".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            CompileErrorKind::NoStages | CompileErrorKind::StageNotFound(_)
        )
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Compile Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for CompileError {}
