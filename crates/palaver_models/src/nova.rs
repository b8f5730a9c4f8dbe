//! Amazon Nova messages wire format.
//!
//! Nova responses have been seen in two shapes: a single `output.message` with
//! a content list, and a `messages` array. Both are accepted.

use crate::params::{GenerationParams, to_body};
use derive_getters::Getters;
use palaver_core::{Role, TokenUsageData, TurnMessage};
use palaver_error::{InferenceError, JsonError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const CONTENT_SHAPES: [&str; 2] = ["/output/message/content", "/messages/0/content"];

/// Nova request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct NovaRequest {
    /// Sampling settings
    #[serde(rename = "inferenceConfig")]
    inference_config: NovaInferenceConfig,
    /// Conversation turns
    messages: Vec<NovaMessage>,
}

/// Nova sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct NovaInferenceConfig {
    /// Maximum tokens to generate
    max_new_tokens: u32,
    /// Sampling temperature
    temperature: f64,
}

/// One turn in a Nova request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovaMessage {
    /// `user` or `assistant`
    pub role: Role,
    /// Content items
    pub content: Vec<NovaContent>,
}

/// One text content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovaContent {
    /// Item text
    pub text: String,
}

impl From<&TurnMessage> for NovaMessage {
    fn from(turn: &TurnMessage) -> Self {
        Self {
            role: turn.role.outbound(),
            content: vec![NovaContent {
                text: turn.content.clone(),
            }],
        }
    }
}

pub(crate) fn build_request(
    turns: &[TurnMessage],
    params: &GenerationParams,
) -> Result<Value, JsonError> {
    to_body(&NovaRequest {
        inference_config: NovaInferenceConfig {
            max_new_tokens: params.max_tokens,
            temperature: params.temperature,
        },
        messages: turns.iter().map(NovaMessage::from).collect(),
    })
}

/// Joins the text items of the first recognized content list with newlines.
///
/// An unrecognized shape is logged and yields empty text.
pub(crate) fn extract_text(body: &Value) -> Result<String, InferenceError> {
    let content = CONTENT_SHAPES
        .iter()
        .find_map(|pointer| body.pointer(pointer).and_then(Value::as_array));

    let Some(items) = content else {
        tracing::warn!(body = %body, "Unexpected Nova response shape");
        return Ok(String::new());
    };

    Ok(items
        .iter()
        .filter_map(|item| item.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub(crate) fn extract_usage(body: &Value) -> Option<TokenUsageData> {
    let usage = body.get("usage")?;
    Some(TokenUsageData::new(
        usage.get("inputTokens")?.as_u64()?,
        usage.get("outputTokens")?.as_u64()?,
    ))
}

pub(crate) fn sample_response(text: &str) -> Value {
    json!({
        "output": {
            "message": {
                "role": "assistant",
                "content": [{ "text": text }],
            }
        },
        "stopReason": "end_turn",
    })
}
