//! Core data types for the Palaver conversation engine.
//!
//! This crate provides the conversation records, provider-neutral turn entries
//! and accounting types shared by every other Palaver crate.

mod conversation;
mod cost;
mod message;
mod metadata;
pub mod observability;
mod role;
mod token_usage;
mod turn;

pub use conversation::{
    Conversation, ConversationBuilder, ConversationConfig, ConversationConfigBuilder,
    FeedbackEntry, FeedbackTable,
};
pub use cost::ModelCostInfo;
pub use message::{ConversationMessage, ConversationMessageBuilder, MessageReplacement, NewMessage};
pub use metadata::{Metadata, merge_metadata};
pub use role::Role;
pub use token_usage::TokenUsageData;
pub use turn::TurnMessage;
