//! Conversation storage collaborator.

use async_trait::async_trait;
use palaver_core::{
    Conversation, ConversationConfig, ConversationMessage, MessageReplacement, Metadata,
    ModelCostInfo, NewMessage,
};
use palaver_error::PalaverResult;

/// Storage operations the turn generator relies on.
///
/// Lookups return `Ok(None)` for a missing record; the engine decides whether
/// absence is an error. Implementations must be safe to share between
/// concurrently running turns of different conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load a conversation by id.
    async fn find_conversation(&self, id: &str) -> PalaverResult<Option<Conversation>>;

    /// Load a conversation's messages in creation order, replaced ones included.
    async fn find_messages(&self, conversation_id: &str) -> PalaverResult<Vec<ConversationMessage>>;

    /// Persist a new message and return it with its assigned id.
    async fn append_message(
        &self,
        conversation_id: &str,
        message: NewMessage,
    ) -> PalaverResult<ConversationMessage>;

    /// Write the regeneration fields of an existing message.
    async fn mark_message_replaced(
        &self,
        message_id: &str,
        replacement: MessageReplacement,
    ) -> PalaverResult<()>;

    /// Write a conversation's accumulated metadata and current stage.
    async fn update_conversation(
        &self,
        conversation_id: &str,
        metadata: &Metadata,
        stage: Option<&str>,
    ) -> PalaverResult<()>;

    /// Load a conversation configuration by id.
    async fn find_conversation_config(&self, id: &str) -> PalaverResult<Option<ConversationConfig>>;

    /// Load pricing for a model.
    async fn find_model_cost_info(&self, model_id: &str) -> PalaverResult<Option<ModelCostInfo>>;
}
