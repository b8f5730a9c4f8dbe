//! Turn generation for Palaver conversations.
//!
//! A turn loads a conversation's history, compiles its instructions, assembles
//! the model-visible sequence, performs one inference call and persists the
//! reply. Regenerating the last reply supersedes it without deleting it.
//!
//! - [`assemble`] and [`plan_regeneration`] are pure and work on borrowed history
//! - [`extract_metadata`] splits embedded `<metadata>` JSON from model output
//! - [`TurnGenerator`] drives a full turn against the collaborator traits
//! - [`InMemoryConversationStore`] implements the store for tests and the CLI

mod assembler;
mod extractor;
mod generator;
mod memory;
mod turn_lock;

pub use assembler::{AssembleInput, RegenerationPlan, assemble, plan_regeneration};
pub use extractor::{ExtractedResponse, extract_metadata};
pub use generator::{STAGE_METADATA_KEY, TurnGenerator, TurnOutcome, TurnSettings};
pub use memory::InMemoryConversationStore;
