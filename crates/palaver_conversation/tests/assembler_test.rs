//! Tests for outgoing turn assembly and regeneration planning.

use palaver_conversation::{AssembleInput, assemble, plan_regeneration};
use palaver_core::{
    ConversationMessage, FeedbackTable, MessageReplacement, Metadata, Role, TurnMessage,
};
use serde_json::json;

fn message(id: &str, role: Role, content: &str) -> ConversationMessage {
    ConversationMessage::builder()
        .id(id)
        .conversation_id("c-1")
        .role(role)
        .content(content)
        .build()
        .expect("valid message")
}

fn metadata(value: serde_json::Value) -> Metadata {
    serde_json::from_value(value).expect("object")
}

fn input<'a>(
    history: &'a [ConversationMessage],
    metadata: &'a Metadata,
    feedback: &'a FeedbackTable,
) -> AssembleInput<'a> {
    AssembleInput {
        history,
        instructions: None,
        metadata,
        feedback,
        regeneration: None,
    }
}

fn contents(turns: &[TurnMessage]) -> Vec<&str> {
    turns.iter().map(|t| t.content.as_str()).collect()
}

#[test]
fn test_no_plan_when_latest_is_user() {
    let history = [
        message("1", Role::User, "hi"),
        message("2", Role::Assistant, "hello"),
        message("3", Role::User, "again"),
    ];
    assert!(plan_regeneration(&history).is_none());
    assert!(plan_regeneration(&[]).is_none());
}

#[test]
fn test_no_plan_when_latest_reply_already_replaced() {
    let replaced = ConversationMessage::builder()
        .id("2")
        .conversation_id("c-1")
        .role(Role::Assistant)
        .content("old")
        .replaced(true)
        .send_to_model(false)
        .iteration(1u32)
        .build()
        .expect("valid message");

    assert!(plan_regeneration(&[message("1", Role::User, "hi"), replaced]).is_none());
}

#[test]
fn test_plan_continues_existing_iteration() {
    let reply = ConversationMessage::builder()
        .id("5")
        .conversation_id("c-1")
        .role(Role::Assistant)
        .content("second try")
        .iteration(2u32)
        .build()
        .expect("valid message");

    let plan = plan_regeneration(&[reply]).expect("active reply");

    assert_eq!(plan.prior_id, "5");
    assert_eq!(plan.next_iteration, 3);
    assert_eq!(
        plan.replacement,
        MessageReplacement {
            replaced: true,
            send_to_model: false,
            iteration: Some(2),
        }
    );
    assert_eq!(
        plan.original,
        MessageReplacement {
            replaced: false,
            send_to_model: true,
            iteration: Some(2),
        }
    );
}

#[test]
fn test_hidden_messages_are_filtered() {
    let hidden = ConversationMessage::builder()
        .id("2")
        .conversation_id("c-1")
        .role(Role::Assistant)
        .content("superseded")
        .send_to_model(false)
        .build()
        .expect("valid message");
    let history = [message("1", Role::User, "hi"), hidden, message("3", Role::Assistant, "kept")];
    let meta = Metadata::new();
    let feedback = FeedbackTable::new();

    let turns = assemble(input(&history, &meta, &feedback));

    assert_eq!(contents(&turns), vec!["hi", "kept"]);
}

#[test]
fn test_regenerated_reply_is_left_out() {
    let history = [
        message("1", Role::User, "hi"),
        message("2", Role::Assistant, "first try"),
    ];
    let plan = plan_regeneration(&history).expect("active reply");
    let meta = Metadata::new();
    let feedback = FeedbackTable::new();

    let turns = assemble(AssembleInput {
        regeneration: Some(&plan),
        ..input(&history, &meta, &feedback)
    });

    assert_eq!(contents(&turns), vec!["hi"]);
}

#[test]
fn test_platform_messages_go_out_as_user() {
    let history = [
        message("1", Role::Platform, "Welcome!"),
        message("2", Role::User, "hi"),
        message("3", Role::Assistant, "hello"),
    ];
    let meta = Metadata::new();
    let feedback = FeedbackTable::new();

    let turns = assemble(input(&history, &meta, &feedback));

    let roles: Vec<Role> = turns.iter().map(|t| t.role).collect();
    assert_eq!(roles, vec![Role::User, Role::User, Role::Assistant]);
    assert_eq!(*history[0].role(), Role::Platform);
}

#[test]
fn test_instructions_are_prepended() {
    let history = [message("1", Role::User, "hi")];
    let meta = Metadata::new();
    let feedback = FeedbackTable::new();

    let turns = assemble(AssembleInput {
        instructions: Some("You are terse."),
        ..input(&history, &meta, &feedback)
    });

    assert_eq!(turns[0], TurnMessage::new(Role::User, "You are terse."));
    assert_eq!(turns.len(), 2);
}

#[test]
fn test_empty_instructions_are_skipped() {
    let history = [message("1", Role::User, "hi")];
    let meta = Metadata::new();
    let feedback = FeedbackTable::new();

    let turns = assemble(AssembleInput {
        instructions: Some(""),
        ..input(&history, &meta, &feedback)
    });

    assert_eq!(contents(&turns), vec!["hi"]);
}

#[test]
fn test_metadata_annotates_only_latest_user_message() {
    let history = [
        message("1", Role::User, "first"),
        message("2", Role::Assistant, "reply"),
        message("3", Role::User, "second"),
        message("4", Role::Platform, "notice"),
    ];
    let meta = metadata(json!({ "mood": "calm" }));
    let feedback = FeedbackTable::new();

    let turns = assemble(AssembleInput {
        instructions: Some("Rules"),
        ..input(&history, &meta, &feedback)
    });

    assert_eq!(
        contents(&turns),
        vec![
            "Rules",
            "first",
            "reply",
            "second<metadata>{\"mood\":\"calm\"}</metadata>",
            "notice",
        ]
    );
}

#[test]
fn test_empty_metadata_is_not_annotated() {
    let history = [message("1", Role::User, "hi")];
    let meta = Metadata::new();
    let feedback = FeedbackTable::new();

    let turns = assemble(input(&history, &meta, &feedback));

    assert_eq!(contents(&turns), vec!["hi"]);
}

#[test]
fn test_feedback_text_is_prefixed() {
    let rated = ConversationMessage::builder()
        .id("2")
        .conversation_id("c-1")
        .role(Role::Assistant)
        .content("reply")
        .feedback("wrong")
        .build()
        .expect("valid message");
    let history = [message("1", Role::User, "first"), rated, message("3", Role::User, "second")];
    let meta = Metadata::new();
    let feedback = FeedbackTable::new()
        .with_entry("wrong", "The last answer was wrong.")
        .with_entry("wrong", "Shadowed entry");

    let turns = assemble(input(&history, &meta, &feedback));

    assert_eq!(turns[2].content, "The last answer was wrong.\n\nsecond");
    assert_eq!(turns[0].content, "first");
}

#[test]
fn test_unknown_feedback_code_is_ignored() {
    let rated = ConversationMessage::builder()
        .id("2")
        .conversation_id("c-1")
        .role(Role::Assistant)
        .content("reply")
        .feedback("meh")
        .build()
        .expect("valid message");
    let history = [message("1", Role::User, "first"), rated, message("3", Role::User, "second")];
    let meta = Metadata::new();
    let feedback = FeedbackTable::new().with_entry("wrong", "The last answer was wrong.");

    let turns = assemble(input(&history, &meta, &feedback));

    assert_eq!(turns[2].content, "second");
}
