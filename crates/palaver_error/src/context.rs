//! Context document error types.

/// Specific error conditions raised while parsing a context document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextErrorKind {
    /// The markup itself is not well formed
    Xml(String),
    /// The document has no `<context>` root element
    MissingRoot(String),
    /// A required element is absent
    MissingElement(String),
    /// A required attribute is absent from an element
    MissingAttribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: String,
    },
    /// A variable declares a type other than string, number or boolean
    UnknownVariableType {
        /// Variable name
        name: String,
        /// Declared type
        declared: String,
    },
    /// Two stages share the same key
    DuplicateStage(String),
    /// Two blocks share the same key
    DuplicateBlock(String),
}

impl std::fmt::Display for ContextErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextErrorKind::Xml(msg) => write!(f, "Malformed markup: {}", msg),
            ContextErrorKind::MissingRoot(found) => {
                write!(f, "Expected <context> root element, found '{}'", found)
            }
            ContextErrorKind::MissingElement(element) => {
                write!(f, "Required element <{}> is missing", element)
            }
            ContextErrorKind::MissingAttribute { element, attribute } => write!(
                f,
                "Element <{}> is missing required attribute '{}'",
                element, attribute
            ),
            ContextErrorKind::UnknownVariableType { name, declared } => write!(
                f,
                "Variable '{}' has unknown type '{}' (expected string, number or boolean)",
                name, declared
            ),
            ContextErrorKind::DuplicateStage(key) => {
                write!(f, "Stage key '{}' is declared more than once", key)
            }
            ContextErrorKind::DuplicateBlock(key) => {
                write!(f, "Block key '{}' is declared more than once", key)
            }
        }
    }
}

/// Error type for context document parsing.
///
/// # Examples
///
/// ```
/// use palaver_error::{ContextError, ContextErrorKind};
///
/// let err = ContextError::new(ContextErrorKind::DuplicateStage("A".to_string()));
/// assert!(format!("{}", err).contains("'A'"));
/// ```
#[derive(Debug, Clone)]
pub struct ContextError {
    /// The specific error condition
    pub kind: ContextErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ContextError {
    /// Create a new ContextError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ContextErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Context Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ContextError {}
