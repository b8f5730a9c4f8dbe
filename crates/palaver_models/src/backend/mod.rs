//! Inference backends.

mod bedrock;
mod mock;

pub use bedrock::BedrockRuntimeBackend;
pub use mock::MockBackend;
