//! Table-driven provider adapters.

use crate::{GenerationParams, ModelFamily, anthropic, generic, llama, nova, titan};
use palaver_core::{TokenUsageData, TurnMessage};
use palaver_error::{InferenceError, JsonError, PalaverResult};
use serde_json::Value;

/// Builds a family's request body from a turn sequence.
pub type BuildRequestFn = fn(&[TurnMessage], &GenerationParams) -> Result<Value, JsonError>;

/// Reads generated text out of a family's response body.
pub type ExtractTextFn = fn(&Value) -> Result<String, InferenceError>;

/// Reads token usage out of a family's response body, when the family reports it.
pub type ExtractUsageFn = fn(&Value) -> Option<TokenUsageData>;

/// Wraps text in a family's response shape.
pub type SampleResponseFn = fn(&str) -> Value;

/// One row of the adapter table.
#[derive(Debug, Clone, Copy)]
pub struct FamilyAdapter {
    /// Family this row serves
    pub family: ModelFamily,
    /// Model id substring that selects this row; `None` for the fallback
    pub pattern: Option<&'static str>,
    /// Request body builder
    pub build_request: BuildRequestFn,
    /// Generated text extractor
    pub extract_text: ExtractTextFn,
    /// Token usage extractor
    pub extract_usage: ExtractUsageFn,
    /// Response shape used by the mock backend
    pub sample_response: SampleResponseFn,
}

/// Adapter rows in match order. The fallback row comes last.
pub(crate) static ADAPTERS: [FamilyAdapter; 5] = [
    FamilyAdapter {
        family: ModelFamily::AnthropicClaude,
        pattern: Some("anthropic.claude"),
        build_request: anthropic::build_request,
        extract_text: anthropic::extract_text,
        extract_usage: anthropic::extract_usage,
        sample_response: anthropic::sample_response,
    },
    FamilyAdapter {
        family: ModelFamily::AmazonTitan,
        pattern: Some("amazon.titan"),
        build_request: titan::build_request,
        extract_text: titan::extract_text,
        extract_usage: titan::extract_usage,
        sample_response: titan::sample_response,
    },
    FamilyAdapter {
        family: ModelFamily::AmazonNova,
        pattern: Some("amazon.nova"),
        build_request: nova::build_request,
        extract_text: nova::extract_text,
        extract_usage: nova::extract_usage,
        sample_response: nova::sample_response,
    },
    FamilyAdapter {
        family: ModelFamily::MetaLlama,
        pattern: Some("meta.llama"),
        build_request: llama::build_request,
        extract_text: llama::extract_text,
        extract_usage: llama::extract_usage,
        sample_response: llama::sample_response,
    },
    FamilyAdapter {
        family: ModelFamily::Generic,
        pattern: None,
        build_request: generic::build_request,
        extract_text: generic::extract_text,
        extract_usage: generic::extract_usage,
        sample_response: generic::sample_response,
    },
];

impl FamilyAdapter {
    /// The table row for a family.
    pub fn for_family(family: ModelFamily) -> &'static FamilyAdapter {
        ADAPTERS
            .iter()
            .find(|row| row.family == family)
            .unwrap_or(&ADAPTERS[ADAPTERS.len() - 1])
    }
}

/// Request/response translation for one model.
///
/// # Examples
///
/// ```
/// use palaver_core::{Role, TurnMessage};
/// use palaver_models::{GenerationParams, ModelFamily, ProviderAdapter};
///
/// let adapter = ProviderAdapter::for_model("meta.llama3-8b-instruct-v1:0");
/// assert_eq!(adapter.family(), ModelFamily::MetaLlama);
///
/// let body = adapter
///     .build_request(&[TurnMessage::new(Role::User, "hi")], &GenerationParams::new(64, 0.2))
///     .expect("serializable");
/// assert_eq!(body["prompt"], "user: hi");
/// assert_eq!(body["max_gen_len"], 64);
///
/// let text = adapter
///     .extract_text(&serde_json::json!({"generation": "hello"}))
///     .expect("llama shape");
/// assert_eq!(text, "hello");
/// ```
#[derive(Debug, Clone)]
pub struct ProviderAdapter {
    model_id: String,
    row: &'static FamilyAdapter,
}

impl ProviderAdapter {
    /// Classifies the model id and selects its table row.
    pub fn for_model(model_id: impl Into<String>) -> Self {
        let model_id = model_id.into();
        let row = FamilyAdapter::for_family(ModelFamily::classify(&model_id));
        Self { model_id, row }
    }

    /// Model id this adapter was built for.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Family the model id was classified into.
    pub fn family(&self) -> ModelFamily {
        self.row.family
    }

    /// Builds the provider request body.
    pub fn build_request(
        &self,
        turns: &[TurnMessage],
        params: &GenerationParams,
    ) -> PalaverResult<Value> {
        let body = (self.row.build_request)(turns, params)?;
        tracing::debug!(
            model_id = %self.model_id,
            family = %self.row.family,
            body = %body,
            "Built provider request"
        );
        Ok(body)
    }

    /// Extracts the generated text from a provider response body.
    pub fn extract_text(&self, body: &Value) -> PalaverResult<String> {
        Ok((self.row.extract_text)(body)?)
    }

    /// Extracts token usage, if the family reports it.
    pub fn extract_usage(&self, body: &Value) -> Option<TokenUsageData> {
        (self.row.extract_usage)(body)
    }

    /// Wraps text in this family's response shape.
    pub fn sample_response(&self, text: &str) -> Value {
        (self.row.sample_response)(text)
    }
}
