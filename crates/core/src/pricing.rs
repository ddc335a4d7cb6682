use serde::{Deserialize, Serialize};

/// `price = floor(base * growth^(probability * scale))`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricingModel {
    #[serde(default = "default_base")]
    pub base: f64,
    #[serde(default = "default_growth")]
    pub growth: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_base() -> f64 {
    1.0
}

fn default_growth() -> f64 {
    2.0
}

fn default_scale() -> f64 {
    8.0
}

impl Default for PricingModel {
    fn default() -> Self {
        Self {
            base: default_base(),
            growth: default_growth(),
            scale: default_scale(),
        }
    }
}

impl PricingModel {
    pub fn price_of(&self, probability: f64) -> i64 {
        let exponent = probability * self.scale;
        (self.base * self.growth.powf(exponent)).floor() as i64
    }

    /// Positive probabilities only map to a price of at least 1 when neither
    /// constant can pull the product below one.
    pub fn is_valid(&self) -> bool {
        self.base.is_finite()
            && self.growth.is_finite()
            && self.scale.is_finite()
            && self.base >= 1.0
            && self.growth >= 1.0
            && self.scale >= 0.0
    }
}
