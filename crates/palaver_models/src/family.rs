//! Model family classification.

use crate::adapter::ADAPTERS;
use serde::{Deserialize, Serialize};

/// A class of models sharing one request/response wire shape.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelFamily {
    /// Messages API with a version tag
    AnthropicClaude,
    /// Single flattened prompt with a generation config
    AmazonTitan,
    /// Messages with content lists and an inference config
    AmazonNova,
    /// Single flattened prompt with a generation length
    MetaLlama,
    /// Anything not matched by a known family
    Generic,
}

impl ModelFamily {
    /// Classifies a model identifier by substring match against the adapter table.
    ///
    /// The first matching row wins.
    ///
    /// ```
    /// use palaver_models::ModelFamily;
    ///
    /// assert_eq!(
    ///     ModelFamily::classify("anthropic.claude-3-haiku-20240307-v1:0"),
    ///     ModelFamily::AnthropicClaude
    /// );
    /// assert_eq!(ModelFamily::classify("us.meta.llama3-1-8b-instruct-v1:0"), ModelFamily::MetaLlama);
    /// assert_eq!(ModelFamily::classify("mistral.mistral-7b-instruct-v0:2"), ModelFamily::Generic);
    /// ```
    pub fn classify(model_id: &str) -> Self {
        ADAPTERS
            .iter()
            .find(|row| row.pattern.is_some_and(|pattern| model_id.contains(pattern)))
            .map(|row| row.family)
            .unwrap_or(ModelFamily::Generic)
    }
}
