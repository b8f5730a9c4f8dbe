//! Fallback wire format for models outside the known families.

use crate::params::{GenerationParams, flatten_prompt, to_body};
use derive_getters::Getters;
use palaver_core::{TokenUsageData, TurnMessage};
use palaver_error::{InferenceError, JsonError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Fallback request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GenericRequest {
    /// Flattened prompt
    prompt: String,
    /// Maximum tokens to generate
    max_tokens: u32,
    /// Sampling temperature
    temperature: f64,
}

/// Fallback response body. Either field may carry the text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Getters)]
pub struct GenericResponse {
    /// Text in the `generated_text` shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_text: Option<String>,
    /// Text in the `completion` shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completion: Option<String>,
}

pub(crate) fn build_request(
    turns: &[TurnMessage],
    params: &GenerationParams,
) -> Result<Value, JsonError> {
    to_body(&GenericRequest {
        prompt: flatten_prompt(turns),
        max_tokens: params.max_tokens,
        temperature: params.temperature,
    })
}

/// First non-empty of `generated_text` and `completion`, else empty.
pub(crate) fn extract_text(body: &Value) -> Result<String, InferenceError> {
    let response = GenericResponse::deserialize(body).unwrap_or_default();
    Ok([response.generated_text, response.completion]
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
        .unwrap_or_default())
}

pub(crate) fn extract_usage(_body: &Value) -> Option<TokenUsageData> {
    None
}

pub(crate) fn sample_response(text: &str) -> Value {
    json!({ "generated_text": text })
}
