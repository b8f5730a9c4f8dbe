//! In-process conversation store.

use async_trait::async_trait;
use chrono::Utc;
use palaver_core::{
    Conversation, ConversationConfig, ConversationMessage, MessageReplacement, Metadata,
    ModelCostInfo, NewMessage,
};
use palaver_error::{PalaverResult, StorageError};
use palaver_interface::ConversationStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// [`ConversationStore`] backed by maps behind async locks.
///
/// Ids are random UUIDs and timestamps are taken when a message is stored.
/// Nothing outlives the value.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
    messages: RwLock<HashMap<String, Vec<ConversationMessage>>>,
    configs: RwLock<HashMap<String, ConversationConfig>>,
    costs: RwLock<HashMap<String, ModelCostInfo>>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a conversation.
    pub async fn insert_conversation(&self, conversation: Conversation) {
        self.conversations
            .write()
            .await
            .insert(conversation.id().clone(), conversation);
    }

    /// Adds or replaces a conversation config.
    pub async fn insert_config(&self, config: ConversationConfig) {
        self.configs.write().await.insert(config.id().clone(), config);
    }

    /// Adds or replaces pricing for a model.
    pub async fn insert_cost_info(&self, info: ModelCostInfo) {
        self.costs.write().await.insert(info.model_id.clone(), info);
    }

    /// Stores a message without checking that its conversation exists.
    pub async fn insert_message(
        &self,
        conversation_id: &str,
        message: NewMessage,
    ) -> ConversationMessage {
        let stored = message.into_message(
            uuid::Uuid::new_v4().to_string(),
            conversation_id,
            Utc::now(),
        );
        self.messages
            .write()
            .await
            .entry(conversation_id.to_string())
            .or_default()
            .push(stored.clone());
        stored
    }

    /// Sets the feedback code on a stored message. Returns false if no message has the id.
    pub async fn set_feedback(&self, message_id: &str, code: impl Into<String>) -> bool {
        let mut messages = self.messages.write().await;
        let Some(message) = messages
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|m| m.id() == message_id)
        else {
            return false;
        };

        message.set_feedback(Some(code.into()));
        true
    }

    /// Snapshot of a conversation's messages in creation order.
    pub async fn messages(&self, conversation_id: &str) -> Vec<ConversationMessage> {
        self.messages
            .read()
            .await
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of a conversation.
    pub async fn conversation(&self, id: &str) -> Option<Conversation> {
        self.conversations.read().await.get(id).cloned()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find_conversation(&self, id: &str) -> PalaverResult<Option<Conversation>> {
        Ok(self.conversation(id).await)
    }

    async fn find_messages(&self, conversation_id: &str) -> PalaverResult<Vec<ConversationMessage>> {
        Ok(self.messages(conversation_id).await)
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        message: NewMessage,
    ) -> PalaverResult<ConversationMessage> {
        if !self.conversations.read().await.contains_key(conversation_id) {
            return Err(StorageError::backend(format!(
                "Cannot append to unknown conversation '{}'",
                conversation_id
            ))
            .into());
        }

        let stored = self.insert_message(conversation_id, message).await;
        tracing::debug!(conversation_id, message_id = %stored.id(), "Appended message");
        Ok(stored)
    }

    async fn mark_message_replaced(
        &self,
        message_id: &str,
        replacement: MessageReplacement,
    ) -> PalaverResult<()> {
        let mut messages = self.messages.write().await;
        let message = messages
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|m| m.id() == message_id)
            .ok_or_else(|| StorageError::backend(format!("Message '{}' does not exist", message_id)))?;

        message.apply_replacement(&replacement);
        Ok(())
    }

    async fn update_conversation(
        &self,
        conversation_id: &str,
        metadata: &Metadata,
        stage: Option<&str>,
    ) -> PalaverResult<()> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations.get_mut(conversation_id).ok_or_else(|| {
            StorageError::backend(format!("Conversation '{}' does not exist", conversation_id))
        })?;

        conversation.update_state(metadata.clone(), stage.map(str::to_string));
        Ok(())
    }

    async fn find_conversation_config(&self, id: &str) -> PalaverResult<Option<ConversationConfig>> {
        Ok(self.configs.read().await.get(id).cloned())
    }

    async fn find_model_cost_info(&self, model_id: &str) -> PalaverResult<Option<ModelCostInfo>> {
        Ok(self.costs.read().await.get(model_id).cloned())
    }
}
