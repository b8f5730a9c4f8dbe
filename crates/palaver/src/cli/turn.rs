//! Turn command handler.

use super::load_document;
use anyhow::Context as _;
use palaver::PalaverConfig;
use palaver_conversation::{InMemoryConversationStore, TurnGenerator, TurnSettings};
use palaver_core::{Conversation, NewMessage, Role};
use palaver_models::build_backend;
use std::path::Path;
use std::sync::Arc;

/// Conversation id used for the throwaway in-memory conversation.
const CLI_CONVERSATION_ID: &str = "cli";

/// Handles the turn command.
#[tracing::instrument(skip_all, fields(document = %document.display(), model = %model))]
pub async fn handle_turn_command(
    config: &PalaverConfig,
    document: &Path,
    model: &str,
    message: &str,
    stage: Option<String>,
    username: Option<String>,
) -> anyhow::Result<()> {
    let (markup, context) = load_document(document)?;
    let stage = stage.or_else(|| context.first_stage().map(|s| s.key.clone()));

    let mut builder = Conversation::builder();
    builder
        .id(CLI_CONVERSATION_ID)
        .model_id(model)
        .instructions(markup.as_str());
    if let Some(stage) = &stage {
        builder.stage(stage.as_str());
    }
    if let Some(username) = &username {
        builder.username(username.as_str());
    }
    let conversation = builder.build().context("Failed to build conversation")?;

    let store = Arc::new(InMemoryConversationStore::new());
    store.insert_conversation(conversation).await;
    store
        .insert_message(CLI_CONVERSATION_ID, NewMessage::text(Role::User, message))
        .await;

    let backend = build_backend(&config.inference)?;
    let generator =
        TurnGenerator::new(store, backend).with_settings(TurnSettings::from(&config.inference));

    let outcome = generator.generate_turn(CLI_CONVERSATION_ID).await?;

    println!("{}", outcome.message.content());
    if let Some(metadata) = &outcome.metadata {
        println!(
            "\nmetadata: {}",
            serde_json::to_string_pretty(&serde_json::Value::Object(metadata.clone()))?
        );
    }
    if let Some(next) = outcome.stage.as_deref().filter(|next| Some(*next) != stage.as_deref()) {
        println!("\nstage: {}", next);
    }
    Ok(())
}
