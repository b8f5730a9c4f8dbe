//! Crate-level error aggregation.

use crate::{
    CompileError, ConfigError, ContextError, InferenceError, JsonError, NotFoundError,
    StorageError, ValidationError,
};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum PalaverErrorKind {
    /// Context document parse failure
    Context(ContextError),
    /// Prompt compilation failure
    Compile(CompileError),
    /// Missing or invalid input
    Validation(ValidationError),
    /// Lookup failure
    NotFound(NotFoundError),
    /// Inference call failure
    Inference(InferenceError),
    /// Storage collaborator failure
    Storage(StorageError),
    /// Configuration error
    Config(ConfigError),
    /// JSON serialization/deserialization error
    Json(JsonError),
}

impl std::fmt::Display for PalaverErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PalaverErrorKind::Context(e) => write!(f, "{}", e),
            PalaverErrorKind::Compile(e) => write!(f, "{}", e),
            PalaverErrorKind::Validation(e) => write!(f, "{}", e),
            PalaverErrorKind::NotFound(e) => write!(f, "{}", e),
            PalaverErrorKind::Inference(e) => write!(f, "{}", e),
            PalaverErrorKind::Storage(e) => write!(f, "{}", e),
            PalaverErrorKind::Config(e) => write!(f, "{}", e),
            PalaverErrorKind::Json(e) => write!(f, "{}", e),
        }
    }
}

/// Palaver error with kind discrimination.
///
/// # Examples
///
/// ```
/// use palaver_error::{NotFoundError, NotFoundKind, PalaverError};
///
/// let err: PalaverError = NotFoundError::new(NotFoundKind::Model("m".into())).into();
/// assert!(err.is_not_found());
/// assert!(!err.is_fatal());
/// ```
#[derive(Debug)]
pub struct PalaverError(Box<PalaverErrorKind>);

impl PalaverError {
    /// Create a new error from a kind.
    pub fn new(kind: PalaverErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PalaverErrorKind {
        &self.0
    }

    /// Returns true for lookup failures, including missing stages.
    pub fn is_not_found(&self) -> bool {
        match self.kind() {
            PalaverErrorKind::NotFound(_) => true,
            PalaverErrorKind::Compile(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Returns true if the error left conversation state needing attention.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), PalaverErrorKind::Storage(e) if e.is_fatal())
    }
}

impl std::fmt::Display for PalaverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Palaver Error: {}", self.0)
    }
}

impl std::error::Error for PalaverError {}

// Generic From implementation for any type that converts to PalaverErrorKind
impl<T> From<T> for PalaverError
where
    T: Into<PalaverErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Palaver operations.
pub type PalaverResult<T> = std::result::Result<T, PalaverError>;
