//! Anthropic Claude messages wire format.

use crate::ModelFamily;
use crate::params::{GenerationParams, malformed, to_body};
use derive_getters::Getters;
use palaver_core::{Role, TokenUsageData, TurnMessage};
use palaver_error::{InferenceError, JsonError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Version tag every Claude request on Bedrock carries.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Claude request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), pattern = "owned")]
pub struct ClaudeRequest {
    /// API version tag
    #[builder(default = "ANTHROPIC_VERSION.to_string()")]
    anthropic_version: String,
    /// Conversation turns
    messages: Vec<ClaudeMessage>,
    /// Maximum tokens to generate
    max_tokens: u32,
    /// Sampling temperature
    temperature: f64,
}

impl ClaudeRequest {
    /// Creates a builder for `ClaudeRequest`.
    pub fn builder() -> ClaudeRequestBuilder {
        ClaudeRequestBuilder::default()
    }
}

/// One turn in a Claude request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaudeMessage {
    /// `user` or `assistant`
    pub role: Role,
    /// Turn text
    pub content: String,
}

impl From<&TurnMessage> for ClaudeMessage {
    fn from(turn: &TurnMessage) -> Self {
        Self {
            role: turn.role.outbound(),
            content: turn.content.clone(),
        }
    }
}

/// Claude response body, reduced to the fields the engine reads.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct ClaudeResponse {
    /// Content items
    #[serde(default)]
    content: Vec<ClaudeContent>,
    /// Token usage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usage: Option<ClaudeUsage>,
}

/// One content item of a Claude response.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct ClaudeContent {
    /// Item type, `text` for generated text
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    /// Generated text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Claude token usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ClaudeUsage {
    /// Prompt tokens
    input_tokens: u64,
    /// Generated tokens
    output_tokens: u64,
}

pub(crate) fn build_request(
    turns: &[TurnMessage],
    params: &GenerationParams,
) -> Result<Value, JsonError> {
    let request = ClaudeRequest::builder()
        .messages(turns.iter().map(ClaudeMessage::from).collect::<Vec<_>>())
        .max_tokens(params.max_tokens)
        .temperature(params.temperature)
        .build()
        .map_err(|e| JsonError::new("Claude request", e))?;
    to_body(&request)
}

pub(crate) fn extract_text(body: &Value) -> Result<String, InferenceError> {
    let response = ClaudeResponse::deserialize(body)
        .map_err(|e| malformed(ModelFamily::AnthropicClaude, e))?;
    response
        .content
        .into_iter()
        .next()
        .and_then(|item| item.text)
        .ok_or_else(|| malformed(ModelFamily::AnthropicClaude, "no text in first content item"))
}

pub(crate) fn extract_usage(body: &Value) -> Option<TokenUsageData> {
    let usage = body.get("usage").map(ClaudeUsage::deserialize)?.ok()?;
    Some(TokenUsageData::new(usage.input_tokens, usage.output_tokens))
}

pub(crate) fn sample_response(text: &str) -> Value {
    json!({
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn",
    })
}

