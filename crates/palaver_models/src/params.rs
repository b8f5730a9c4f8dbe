//! Provider-neutral generation parameters.

use palaver_core::TurnMessage;
use serde::{Deserialize, Serialize};

/// Temperature used when neither the conversation nor its config sets one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Token limit used when neither the conversation nor its config sets one.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Sampling parameters for a single inference call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
}

impl GenerationParams {
    /// Creates parameters from explicit values.
    pub fn new(max_tokens: u32, temperature: f64) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE)
    }
}

/// Flattens a turn sequence into `role: content` lines for single-prompt families.
///
/// Roles are written in their outbound form, so platform turns read as `user`.
///
/// ```
/// use palaver_core::{Role, TurnMessage};
/// use palaver_models::flatten_prompt;
///
/// let turns = [
///     TurnMessage::new(Role::Platform, "welcome"),
///     TurnMessage::new(Role::User, "hi"),
///     TurnMessage::new(Role::Assistant, "hello"),
/// ];
/// assert_eq!(
///     flatten_prompt(&turns),
///     "user: welcome\nuser: hi\nassistant: hello"
/// );
/// ```
pub fn flatten_prompt(turns: &[TurnMessage]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role.outbound(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes a request DTO into a JSON body.
pub(crate) fn to_body<T: Serialize>(request: &T) -> Result<serde_json::Value, palaver_error::JsonError> {
    serde_json::to_value(request)
        .map_err(|e| palaver_error::JsonError::new(std::any::type_name::<T>(), e))
}

/// Error for a response body that does not have the family's shape.
#[track_caller]
pub(crate) fn malformed(
    family: crate::ModelFamily,
    detail: impl std::fmt::Display,
) -> palaver_error::InferenceError {
    palaver_error::InferenceError::new(palaver_error::InferenceErrorKind::MalformedResponse(
        format!("{} response: {}", family, detail),
    ))
}
