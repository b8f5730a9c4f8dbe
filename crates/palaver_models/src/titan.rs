//! Amazon Titan text wire format.

use crate::ModelFamily;
use crate::params::{GenerationParams, flatten_prompt, malformed, to_body};
use derive_getters::Getters;
use palaver_core::{TokenUsageData, TurnMessage};
use palaver_error::{InferenceError, JsonError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Nucleus sampling value sent with every Titan request.
pub const TITAN_TOP_P: f64 = 0.9;

/// Titan request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct TitanRequest {
    /// Flattened prompt
    input_text: String,
    /// Sampling settings
    text_generation_config: TitanGenerationConfig,
}

/// Titan sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct TitanGenerationConfig {
    /// Maximum tokens to generate
    max_token_count: u32,
    /// Sampling temperature
    temperature: f64,
    /// Nucleus sampling
    top_p: f64,
}

/// Titan response body.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct TitanResponse {
    /// Prompt tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_text_token_count: Option<u64>,
    /// Generated results
    #[serde(default)]
    results: Vec<TitanResult>,
}

/// One Titan result.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct TitanResult {
    /// Generated text
    output_text: String,
    /// Generated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_count: Option<u64>,
    /// Why generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completion_reason: Option<String>,
}

pub(crate) fn build_request(
    turns: &[TurnMessage],
    params: &GenerationParams,
) -> Result<Value, JsonError> {
    to_body(&TitanRequest {
        input_text: flatten_prompt(turns),
        text_generation_config: TitanGenerationConfig {
            max_token_count: params.max_tokens,
            temperature: params.temperature,
            top_p: TITAN_TOP_P,
        },
    })
}

pub(crate) fn extract_text(body: &Value) -> Result<String, InferenceError> {
    let response =
        TitanResponse::deserialize(body).map_err(|e| malformed(ModelFamily::AmazonTitan, e))?;
    response
        .results
        .into_iter()
        .next()
        .map(|result| result.output_text)
        .ok_or_else(|| malformed(ModelFamily::AmazonTitan, "no results"))
}

pub(crate) fn extract_usage(body: &Value) -> Option<TokenUsageData> {
    let response = TitanResponse::deserialize(body).ok()?;
    let input = response.input_text_token_count?;
    let output = response.results.first()?.token_count?;
    Some(TokenUsageData::new(input, output))
}

pub(crate) fn sample_response(text: &str) -> Value {
    json!({
        "results": [{ "outputText": text, "completionReason": "FINISH" }],
    })
}
