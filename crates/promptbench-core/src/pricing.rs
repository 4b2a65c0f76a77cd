//! Token pricing.

use serde::{Deserialize, Serialize};

/// Bedrock list price for Claude Opus 4.5 input tokens, USD per million.
pub const OPUS_INPUT_PER_MILLION: f64 = 15.00;

/// Bedrock list price for Claude Opus 4.5 output tokens, USD per million.
pub const OPUS_OUTPUT_PER_MILLION: f64 = 75.00;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Cost in USD of a call, given per-million-token rates.
pub fn cost(
    tokens_in: u64,
    tokens_out: u64,
    rate_in_per_million: f64,
    rate_out_per_million: f64,
) -> f64 {
    let input_cost = (tokens_in as f64 / TOKENS_PER_MILLION) * rate_in_per_million;
    let output_cost = (tokens_out as f64 / TOKENS_PER_MILLION) * rate_out_per_million;
    input_cost + output_cost
}

/// Per-million-token rates for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Pricing {
    pub const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    pub fn cost(&self, tokens_in: u64, tokens_out: u64) -> f64 {
        cost(
            tokens_in,
            tokens_out,
            self.input_per_million,
            self.output_per_million,
        )
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::new(OPUS_INPUT_PER_MILLION, OPUS_OUTPUT_PER_MILLION)
    }
}
