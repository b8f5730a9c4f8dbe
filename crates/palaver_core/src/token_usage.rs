//! Token counts reported by a backend.

use serde::{Deserialize, Serialize};

/// Prompt and completion token counts for one inference call.
///
/// Each model family reports these under its own field names; the family's
/// usage extractor maps them here.
///
/// ```
/// use palaver_core::TokenUsageData;
///
/// let usage = TokenUsageData::new(150, 50);
/// assert_eq!(usage.input_tokens, 150);
/// assert_eq!(usage.total_tokens(), 200);
/// assert!((usage.cost_at(1.0, 2.0) - 0.25).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenUsageData {
    /// Tokens consumed by the prompt
    pub input_tokens: u64,
    /// Tokens generated in the reply
    pub output_tokens: u64,
}

impl TokenUsageData {
    /// Counts for one call.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Input plus output tokens.
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Price of these counts given per-thousand rates.
    pub fn cost_at(&self, input_per_1k: f64, output_per_1k: f64) -> f64 {
        let per_1k = |tokens: u64| tokens as f64 / 1000.0;
        per_1k(self.input_tokens) * input_per_1k + per_1k(self.output_tokens) * output_per_1k
    }
}
