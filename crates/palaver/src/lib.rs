//! Stage-aware prompt compilation and multi-provider turn generation.
//!
//! Palaver turns a context document (stages, blocks and typed variables) into
//! instruction text for the current stage of a conversation, assembles the
//! model-visible history, translates it into the request shape of the model's
//! provider family and persists the reply through a storage collaborator.
//!
//! # Crates
//!
//! - [`palaver_context`]: context document parsing, compilation and checks
//! - [`palaver_models`]: provider adapters and inference backends
//! - [`palaver_conversation`]: turn assembly and generation
//! - [`palaver_interface`]: the store and backend traits
//! - [`palaver_core`], [`palaver_error`]: shared data and error types
//!
//! # Example
//!
//! ```
//! use palaver::{Variable, compile, parse_context};
//!
//! let context = parse_context(
//!     r#"<context>
//!       <stage key="A" blocks="intro"/>
//!       <block key="intro">Hello {{username}}</block>
//!     </context>"#,
//! )
//! .expect("valid document");
//!
//! let text = compile(&context, Some("A"), &[Variable::string("username", "Ana")])
//!     .expect("stage exists");
//! assert_eq!(text, "Hello Ana");
//! ```

mod config;

pub use config::{LoggingConfig, PalaverConfig};

pub use palaver_context::{
    Block, CheckIssue, CheckIssueKind, CheckReport, Context, ContextCache, Stage, Variable,
    VariableType, VariableValue, check_document, compile, is_context_document, parse_context,
    resolve_instructions, substitute_variables,
};
pub use palaver_conversation::{
    AssembleInput, ExtractedResponse, InMemoryConversationStore, RegenerationPlan,
    STAGE_METADATA_KEY, TurnGenerator, TurnOutcome, TurnSettings, assemble, extract_metadata,
    plan_regeneration,
};
pub use palaver_core::{
    Conversation, ConversationConfig, ConversationMessage, FeedbackTable, MessageReplacement,
    Metadata, ModelCostInfo, NewMessage, Role, TokenUsageData, TurnMessage, merge_metadata,
    observability::{LogFormat, init_logging},
};
pub use palaver_error::{ConfigErrorKind, PalaverError, PalaverErrorKind, PalaverResult};
pub use palaver_interface::{ConversationStore, InferenceBackend};
pub use palaver_models::{
    BackendKind, BedrockRuntimeBackend, GenerationParams, InferenceConfig, MockBackend,
    ModelFamily, ProviderAdapter, build_backend,
};
