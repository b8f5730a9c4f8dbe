//! Tests for the in-memory conversation store.

use palaver_conversation::InMemoryConversationStore;
use palaver_core::{Conversation, MessageReplacement, Metadata, NewMessage, Role};
use palaver_error::PalaverErrorKind;
use palaver_interface::ConversationStore;
use serde_json::json;

async fn store() -> InMemoryConversationStore {
    let store = InMemoryConversationStore::new();
    store
        .insert_conversation(
            Conversation::builder()
                .id("c-1")
                .stage("A")
                .build()
                .expect("valid conversation"),
        )
        .await;
    store
}

#[tokio::test]
async fn test_append_assigns_ids_in_order() {
    let store = store().await;

    let first = store
        .append_message("c-1", NewMessage::text(Role::User, "one"))
        .await
        .expect("append");
    let second = store
        .append_message("c-1", NewMessage::text(Role::Assistant, "two"))
        .await
        .expect("append");

    assert_ne!(first.id(), second.id());
    let messages = store.find_messages("c-1").await.expect("find");
    let contents: Vec<&str> = messages.iter().map(|m| m.content().as_str()).collect();
    assert_eq!(contents, vec!["one", "two"]);
    assert!(store.find_messages("other").await.expect("find").is_empty());
}

#[tokio::test]
async fn test_append_to_unknown_conversation_fails() {
    let store = store().await;

    let err = store
        .append_message("missing", NewMessage::text(Role::User, "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), PalaverErrorKind::Storage(_)));
}

#[tokio::test]
async fn test_mark_replaced_updates_only_regeneration_fields() {
    let store = store().await;
    let reply = store
        .append_message("c-1", NewMessage::text(Role::Assistant, "draft"))
        .await
        .expect("append");

    store
        .mark_message_replaced(
            reply.id(),
            MessageReplacement {
                replaced: true,
                send_to_model: false,
                iteration: Some(1),
            },
        )
        .await
        .expect("mark");

    let stored = &store.messages("c-1").await[0];
    assert!(*stored.replaced());
    assert!(!*stored.send_to_model());
    assert!(*stored.send_to_user());
    assert_eq!(*stored.iteration(), Some(1));
    assert_eq!(stored.content(), "draft");

    assert!(
        store
            .mark_message_replaced("nope", stored.current_replacement())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_update_conversation_keeps_stage_when_none_given() {
    let store = store().await;
    let metadata: Metadata = serde_json::from_value(json!({ "k": 1 })).expect("object");

    store
        .update_conversation("c-1", &metadata, None)
        .await
        .expect("update");
    let conversation = store.conversation("c-1").await.expect("stored");
    assert_eq!(conversation.stage().as_deref(), Some("A"));
    assert_eq!(conversation.metadata(), &metadata);

    store
        .update_conversation("c-1", &metadata, Some("B"))
        .await
        .expect("update");
    let conversation = store.conversation("c-1").await.expect("stored");
    assert_eq!(conversation.stage().as_deref(), Some("B"));

    assert!(store.update_conversation("nope", &metadata, None).await.is_err());
}

#[tokio::test]
async fn test_set_feedback_on_unknown_message() {
    let store = store().await;

    assert!(!store.set_feedback("nope", "helpful").await);
}
