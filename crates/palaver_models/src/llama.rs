//! Meta Llama text wire format.

use crate::ModelFamily;
use crate::params::{GenerationParams, flatten_prompt, malformed, to_body};
use derive_getters::Getters;
use palaver_core::{TokenUsageData, TurnMessage};
use palaver_error::{InferenceError, JsonError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Llama request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct LlamaRequest {
    /// Flattened prompt
    prompt: String,
    /// Maximum tokens to generate
    max_gen_len: u32,
    /// Sampling temperature
    temperature: f64,
}

/// Llama response body.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct LlamaResponse {
    /// Generated text
    generation: String,
    /// Prompt tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt_token_count: Option<u64>,
    /// Generated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generation_token_count: Option<u64>,
    /// Why generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop_reason: Option<String>,
}

pub(crate) fn build_request(
    turns: &[TurnMessage],
    params: &GenerationParams,
) -> Result<Value, JsonError> {
    to_body(&LlamaRequest {
        prompt: flatten_prompt(turns),
        max_gen_len: params.max_tokens,
        temperature: params.temperature,
    })
}

pub(crate) fn extract_text(body: &Value) -> Result<String, InferenceError> {
    LlamaResponse::deserialize(body)
        .map(|response| response.generation)
        .map_err(|e| malformed(ModelFamily::MetaLlama, e))
}

pub(crate) fn extract_usage(body: &Value) -> Option<TokenUsageData> {
    let response = LlamaResponse::deserialize(body).ok()?;
    Some(TokenUsageData::new(
        response.prompt_token_count?,
        response.generation_token_count?,
    ))
}

pub(crate) fn sample_response(text: &str) -> Value {
    json!({ "generation": text, "stop_reason": "stop" })
}
