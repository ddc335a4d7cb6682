use crate::PricingModel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest supported sequence; the grid holds `n * (n + 1)` cells.
pub const MAX_SEQUENCE_LENGTH: usize = 13;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("sequence length must be at least 1")]
    ZeroSequenceLength,
    #[error("sequence length {0} exceeds the maximum of {max}", max = MAX_SEQUENCE_LENGTH)]
    SequenceTooLong(usize),
    #[error("pricing constants cannot produce positive prices: {0:?}")]
    InvalidPricing(PricingModel),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    /// Methods per sequence; also the grid width (the grid is one row taller).
    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,
    #[serde(default = "default_chips")]
    pub default_chips: i64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub pricing: PricingModel,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_sequence_length() -> usize {
    3
}

fn default_chips() -> i64 {
    100
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sequence_length: default_sequence_length(),
            default_chips: default_chips(),
            tick_interval_ms: default_tick_interval_ms(),
            pricing: PricingModel::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence_length == 0 {
            return Err(ConfigError::ZeroSequenceLength);
        }
        if self.sequence_length > MAX_SEQUENCE_LENGTH {
            return Err(ConfigError::SequenceTooLong(self.sequence_length));
        }
        if !self.pricing.is_valid() {
            return Err(ConfigError::InvalidPricing(self.pricing));
        }
        Ok(())
    }
}
