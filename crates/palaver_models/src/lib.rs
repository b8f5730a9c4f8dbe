//! Provider adapters and inference backends for Palaver.
//!
//! Model identifiers are classified into a [`ModelFamily`]. Each family has one
//! row in a static adapter table that knows how to build that family's request
//! body and read text and token usage back out of its response body.
//!
//! Backends implement [`palaver_interface::InferenceBackend`]:
//! - [`BedrockRuntimeBackend`] posts request bodies to a Bedrock runtime endpoint
//! - [`MockBackend`] answers with fixed text in the family's response shape
//!
//! [`build_backend`] picks one from [`InferenceConfig`].

mod adapter;
mod anthropic;
mod backend;
mod config;
mod family;
mod generic;
mod llama;
mod nova;
mod params;
mod titan;

pub use adapter::{FamilyAdapter, ProviderAdapter};
pub use anthropic::{
    ANTHROPIC_VERSION, ClaudeContent, ClaudeMessage, ClaudeRequest, ClaudeRequestBuilder,
    ClaudeResponse, ClaudeUsage,
};
pub use backend::{BedrockRuntimeBackend, MockBackend};
pub use config::{
    BackendKind, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, InferenceConfig, MockSettings,
    build_backend,
};
pub use family::ModelFamily;
pub use generic::{GenericRequest, GenericResponse};
pub use llama::{LlamaRequest, LlamaResponse};
pub use nova::{NovaContent, NovaInferenceConfig, NovaMessage, NovaRequest};
pub use params::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParams, flatten_prompt};
pub use titan::{TITAN_TOP_P, TitanGenerationConfig, TitanRequest, TitanResponse, TitanResult};
