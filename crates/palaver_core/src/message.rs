//! Persisted conversation messages.

use crate::{Metadata, Role, TokenUsageData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message stored in a conversation's history.
///
/// Messages are created once by a turn. Only `replaced`, `send_to_model` and
/// `iteration` change afterwards, and only through a regeneration.
///
/// # Examples
///
/// ```
/// use palaver_core::{ConversationMessage, Role};
///
/// let message = ConversationMessage::builder()
///     .id("m-1")
///     .conversation_id("c-1")
///     .role(Role::User)
///     .content("Hello!")
///     .build()
///     .expect("valid message");
///
/// assert_eq!(*message.role(), Role::User);
/// assert!(*message.send_to_model());
/// assert!(!*message.replaced());
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
pub struct ConversationMessage {
    /// Store-assigned identifier
    id: String,
    /// Owning conversation
    conversation_id: String,
    /// Original author role (kept as stored, remapped only on the way out)
    role: Role,
    /// Message text
    content: String,
    /// Stage the conversation was in when the message was created
    #[builder(default, setter(strip_option))]
    stage: Option<String>,
    /// Regeneration counter for this logical turn
    #[builder(default, setter(strip_option))]
    iteration: Option<u32>,
    /// Whether the message is part of the model-visible history
    #[builder(default = "true")]
    send_to_model: bool,
    /// Whether the message is shown to the end user
    #[builder(default = "true")]
    send_to_user: bool,
    /// Superseded by a regeneration but kept for audit
    #[builder(default)]
    replaced: bool,
    /// Feedback code the user left on this message
    #[builder(default, setter(strip_option))]
    feedback: Option<String>,
    /// Metadata extracted from the model output
    #[builder(default, setter(strip_option))]
    metadata: Option<Metadata>,
    /// Model that produced the message
    #[builder(default, setter(strip_option))]
    model_id: Option<String>,
    /// Sampling temperature used
    #[builder(default, setter(strip_option))]
    temperature: Option<f64>,
    /// Token usage reported by the backend
    #[builder(default, setter(strip_option))]
    usage: Option<TokenUsageData>,
    /// Estimated cost of the generation
    #[builder(default, setter(strip_option))]
    cost: Option<f64>,
    /// Creation timestamp
    #[builder(default = "Utc::now()")]
    created_at: DateTime<Utc>,
}

impl ConversationMessage {
    /// Returns a builder for constructing a ConversationMessage.
    pub fn builder() -> ConversationMessageBuilder {
        ConversationMessageBuilder::default()
    }

    /// Returns true for an assistant message that has not been superseded.
    pub fn is_active_assistant(&self) -> bool {
        self.role == Role::Assistant && !self.replaced
    }

    /// Applies the fields a regeneration is allowed to change.
    pub fn apply_replacement(&mut self, replacement: &MessageReplacement) {
        self.replaced = replacement.replaced;
        self.send_to_model = replacement.send_to_model;
        self.iteration = replacement.iteration;
    }

    /// Records or clears the feedback code the user left on this message.
    pub fn set_feedback(&mut self, code: Option<String>) {
        self.feedback = code;
    }

    /// The replacement that would restore this message to its current state.
    pub fn current_replacement(&self) -> MessageReplacement {
        MessageReplacement {
            replaced: self.replaced,
            send_to_model: self.send_to_model,
            iteration: self.iteration,
        }
    }
}

/// The post-creation fields a regeneration writes to a prior message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageReplacement {
    /// New `replaced` flag
    pub replaced: bool,
    /// New `send_to_model` flag
    pub send_to_model: bool,
    /// New iteration
    pub iteration: Option<u32>,
}

/// Fields for a message the store has not assigned an id to yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
    pub stage: Option<String>,
    pub iteration: Option<u32>,
    pub send_to_model: bool,
    pub send_to_user: bool,
    pub metadata: Option<Metadata>,
    pub model_id: Option<String>,
    pub temperature: Option<f64>,
    pub usage: Option<TokenUsageData>,
    pub cost: Option<f64>,
}

impl NewMessage {
    /// A plain text message visible to both the model and the user.
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            stage: None,
            iteration: None,
            send_to_model: true,
            send_to_user: true,
            metadata: None,
            model_id: None,
            temperature: None,
            usage: None,
            cost: None,
        }
    }

    /// Turns the fields into a stored message once the store has an id for it.
    pub fn into_message(
        self,
        id: impl Into<String>,
        conversation_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> ConversationMessage {
        ConversationMessage {
            id: id.into(),
            conversation_id: conversation_id.into(),
            role: self.role,
            content: self.content,
            stage: self.stage,
            iteration: self.iteration,
            send_to_model: self.send_to_model,
            send_to_user: self.send_to_user,
            replaced: false,
            feedback: None,
            metadata: self.metadata,
            model_id: self.model_id,
            temperature: self.temperature,
            usage: self.usage,
            cost: self.cost,
            created_at,
        }
    }
}
