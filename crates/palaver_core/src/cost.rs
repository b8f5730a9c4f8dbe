//! Per-model pricing.

use crate::TokenUsageData;
use serde::{Deserialize, Serialize};

/// Pricing for one model, in currency units per thousand tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCostInfo {
    /// Model identifier the prices apply to
    pub model_id: String,
    /// Price per 1000 input tokens
    pub input_cost_per_1k: f64,
    /// Price per 1000 output tokens
    pub output_cost_per_1k: f64,
}

impl ModelCostInfo {
    /// Cost of a generation with the given usage.
    ///
    /// ```
    /// use palaver_core::{ModelCostInfo, TokenUsageData};
    ///
    /// let info = ModelCostInfo {
    ///     model_id: "m".into(),
    ///     input_cost_per_1k: 0.25,
    ///     output_cost_per_1k: 1.25,
    /// };
    /// let cost = info.cost_for(&TokenUsageData::new(2000, 400));
    /// assert!((cost - 1.0).abs() < 1e-9);
    /// ```
    pub fn cost_for(&self, usage: &TokenUsageData) -> f64 {
        usage.cost_at(self.input_cost_per_1k, self.output_cost_per_1k)
    }
}
