//! Trait definitions for the Palaver conversation engine.
//!
//! The engine owns no persistence and no network transport. It talks to
//! both through the traits in this crate.

mod backend;
mod store;

pub use backend::InferenceBackend;
pub use store::ConversationStore;
