//! Storage collaborator error types.

/// Specific error conditions reported by or about the conversation store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StorageErrorKind {
    /// The store rejected an operation
    #[display("Storage backend error: {}", _0)]
    Backend(String),

    /// A generated message could not be persisted after the inference call
    /// succeeded. When it was superseding an earlier reply the conversation
    /// may need manual repair.
    #[display("Turn for conversation '{}' was generated but not persisted: {}", conversation_id, message)]
    TurnNotPersisted {
        /// Conversation the turn belongs to
        conversation_id: String,
        /// Underlying failure
        message: String,
        /// Whether an earlier reply had already been marked replaced
        regenerating: bool,
    },
}

/// Error type for storage operations.
#[derive(Debug, Clone)]
pub struct StorageError {
    /// The specific error condition
    pub kind: StorageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StorageError {
    /// Create a new StorageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a backend error from a message.
    #[track_caller]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::Backend(message.into()))
    }

    /// Returns true if the conversation was left needing attention.
    ///
    /// ```
    /// use palaver_error::{StorageError, StorageErrorKind};
    ///
    /// let lost = |regenerating| {
    ///     StorageError::new(StorageErrorKind::TurnNotPersisted {
    ///         conversation_id: "c".into(),
    ///         message: "disk full".into(),
    ///         regenerating,
    ///     })
    /// };
    /// assert!(lost(true).is_fatal());
    /// assert!(!lost(false).is_fatal());
    /// assert!(!StorageError::backend("disk full").is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            StorageErrorKind::TurnNotPersisted {
                regenerating: true,
                ..
            }
        )
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Storage Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for StorageError {}
