//! Conversation records and their configuration.

use crate::Metadata;
use serde::{Deserialize, Serialize};

/// A conversation as the storage layer hands it to the engine.
///
/// # Examples
///
/// ```
/// use palaver_core::Conversation;
///
/// let conversation = Conversation::builder()
///     .id("c-1")
///     .model_id("anthropic.claude-3-haiku-20240307-v1:0")
///     .stage("A")
///     .build()
///     .expect("valid conversation");
///
/// assert_eq!(conversation.stage().as_deref(), Some("A"));
/// assert!(conversation.metadata().is_empty());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Conversation {
    /// Conversation identifier
    id: String,
    /// Model override for this conversation
    #[builder(default, setter(strip_option))]
    model_id: Option<String>,
    /// Temperature override
    #[builder(default, setter(strip_option))]
    temperature: Option<f64>,
    /// Max tokens override
    #[builder(default, setter(strip_option))]
    max_tokens: Option<u32>,
    /// Instruction override (context document or plain text)
    #[builder(default, setter(strip_option))]
    instructions: Option<String>,
    /// Current stage key
    #[builder(default, setter(strip_option))]
    stage: Option<String>,
    /// Name of the person chatting
    #[builder(default, setter(strip_option))]
    username: Option<String>,
    /// Configuration this conversation was started from
    #[builder(default, setter(strip_option))]
    config_id: Option<String>,
    /// Metadata accumulated over the conversation
    #[builder(default)]
    #[serde(default)]
    metadata: Metadata,
}

impl Conversation {
    /// Returns a builder for constructing a Conversation.
    pub fn builder() -> ConversationBuilder {
        ConversationBuilder::default()
    }

    /// Replaces the accumulated metadata and, when given, the current stage.
    pub fn update_state(&mut self, metadata: Metadata, stage: Option<String>) {
        self.metadata = metadata;
        if stage.is_some() {
            self.stage = stage;
        }
    }
}

/// Conversation defaults shared by every conversation started from it.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct ConversationConfig {
    /// Configuration identifier
    id: String,
    /// Default instructions (context document or plain text)
    #[builder(default, setter(strip_option))]
    instructions: Option<String>,
    /// First message shown to the user in place of the model's first reply
    #[builder(default, setter(strip_option))]
    welcome_message: Option<String>,
    /// Default model
    #[builder(default, setter(strip_option))]
    model_id: Option<String>,
    /// Default temperature
    #[builder(default, setter(strip_option))]
    temperature: Option<f64>,
    /// Default max tokens
    #[builder(default, setter(strip_option))]
    max_tokens: Option<u32>,
    /// Feedback codes and the text each one sends to the model
    #[builder(default)]
    #[serde(default)]
    feedback: FeedbackTable,
}

impl ConversationConfig {
    /// Returns a builder for constructing a ConversationConfig.
    pub fn builder() -> ConversationConfigBuilder {
        ConversationConfigBuilder::default()
    }
}

/// One feedback button: the stored code and the text sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Code stored on the message
    pub code: String,
    /// Text prefixed to the next user message
    pub text: String,
}

/// Ordered code to text table. The first entry with a matching code wins.
///
/// ```
/// use palaver_core::FeedbackTable;
///
/// let table = FeedbackTable::new()
///     .with_entry("helpful", "The last answer was helpful.")
///     .with_entry("wrong", "The last answer was wrong.");
///
/// assert_eq!(table.text_for("wrong"), Some("The last answer was wrong."));
/// assert_eq!(table.text_for("meh"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackTable(Vec<FeedbackEntry>);

impl FeedbackTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn with_entry(mut self, code: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.push(FeedbackEntry {
            code: code.into(),
            text: text.into(),
        });
        self
    }

    /// Text for a stored feedback code, if the table knows it.
    pub fn text_for(&self, code: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.text.as_str())
    }

    /// Entries in table order.
    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.0
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
