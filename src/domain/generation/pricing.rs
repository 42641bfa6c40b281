//! Per-model token pricing and run cost accounting.

use crate::domain::foundation::ConfigurationError;

/// USD per token (input, output) for metered models.
const PRICING_OPTIONS: &[(&str, f64, f64)] = &[
    ("gpt-3.5-turbo", 0.5 / 1e6, 1.5 / 1e6),
    ("gpt-4o", 5.0 / 1e6, 15.0 / 1e6),
];

/// Fixed price per token for one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    /// USD per prompt token.
    pub input_per_token: f64,
    /// USD per completion token.
    pub output_per_token: f64,
}

impl ModelPricing {
    /// Looks up the price entry for `model`. The name must match exactly.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnpricedModel` when the model has no
    /// entry.
    pub fn for_model(model: &str) -> Result<Self, ConfigurationError> {
        PRICING_OPTIONS
            .iter()
            .find(|(name, _, _)| *name == model)
            .map(|&(_, input_per_token, output_per_token)| Self {
                input_per_token,
                output_per_token,
            })
            .ok_or_else(|| ConfigurationError::UnpricedModel(model.to_string()))
    }

    /// Cost in USD of the given token counts.
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        self.input_per_token * input_tokens as f64 + self.output_per_token * output_tokens as f64
    }
}

/// Cost of one item together with the running total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostReport {
    pub item_cost: f64,
    pub total_cost: f64,
}

/// Accumulates token counts across a run.
#[derive(Debug, Clone)]
pub struct CostTracker {
    pricing: ModelPricing,
    total_input_tokens: u64,
    total_output_tokens: u64,
}

impl CostTracker {
    /// Creates a tracker with zero usage.
    pub fn new(pricing: ModelPricing) -> Self {
        Self {
            pricing,
            total_input_tokens: 0,
            total_output_tokens: 0,
        }
    }

    /// Adds one item's token counts and prices them.
    pub fn record(&mut self, input_tokens: u64, output_tokens: u64) -> CostReport {
        self.total_input_tokens += input_tokens;
        self.total_output_tokens += output_tokens;

        CostReport {
            item_cost: self.pricing.cost(input_tokens, output_tokens),
            total_cost: self.total_cost(),
        }
    }

    /// Cumulative cost in USD.
    pub fn total_cost(&self) -> f64 {
        self.pricing
            .cost(self.total_input_tokens, self.total_output_tokens)
    }

    /// Cumulative prompt tokens.
    pub fn total_input_tokens(&self) -> u64 {
        self.total_input_tokens
    }

    /// Cumulative completion tokens.
    pub fn total_output_tokens(&self) -> u64 {
        self.total_output_tokens
    }
}
