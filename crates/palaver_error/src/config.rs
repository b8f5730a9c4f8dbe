//! Configuration error types.

/// What part of the configuration was unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// The config file could not be read
    #[display("Failed to read config file: {}", _0)]
    Read(String),

    /// The config file is not valid TOML for the expected tables
    #[display("Failed to parse config: {}", _0)]
    Parse(String),

    /// A setting has a value outside its domain
    #[display("Invalid value '{}' for {}; expected {}", value, key, expected)]
    InvalidValue {
        /// Setting or environment variable name
        key: String,
        /// Offending value
        value: String,
        /// What would have been accepted
        expected: String,
    },

    /// A conversation's stored instructions could not be compiled
    #[display("Instructions for conversation '{}' could not be compiled: {}", conversation_id, message)]
    Instructions {
        /// Conversation whose instructions failed
        conversation_id: String,
        /// Underlying parse or compile failure
        message: String,
    },

    /// The HTTP client for a backend could not be constructed
    #[display("Failed to build HTTP client: {}", _0)]
    HttpClient(String),
}

/// Configuration error with source location.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The specific error condition
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver_error::{ConfigError, ConfigErrorKind};
    ///
    /// let err = ConfigError::new(ConfigErrorKind::InvalidValue {
    ///     key: "PALAVER_BACKEND".into(),
    ///     value: "carrier-pigeon".into(),
    ///     expected: "bedrock or mock".into(),
    /// });
    /// assert!(err.to_string().contains("'carrier-pigeon' for PALAVER_BACKEND"));
    /// ```
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// A setting with a value outside its domain.
    #[track_caller]
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::new(ConfigErrorKind::InvalidValue {
            key: key.into(),
            value: value.into(),
            expected: expected.into(),
        })
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ConfigError {}
