use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// Lowest sampled price
pub const PRICE_MIN: f64 = 1.0;
/// Highest sampled price
pub const PRICE_MAX: f64 = 100.0;
/// Number of price samples
pub const NUM_SAMPLES: usize = 500;
/// Demand shift per unit of substitute price above the reference
pub const SUBSTITUTE_SENSITIVITY: f64 = 1.5;
/// Reference substitute price at which demand is unshifted
pub const BASE_SUBSTITUTE_PRICE: f64 = 50.0;
/// Externality is divided by this before shifting supply
pub const EXTERNALITY_SCALE: f64 = 10.0;

/// Fixed constants of the market model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub price_min: f64,
    pub price_max: f64,
    pub num_samples: usize,
    pub substitute_sensitivity: f64,
    pub base_substitute_price: f64,
    pub externality_scale: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            price_min: PRICE_MIN,
            price_max: PRICE_MAX,
            num_samples: NUM_SAMPLES,
            substitute_sensitivity: SUBSTITUTE_SENSITIVITY,
            base_substitute_price: BASE_SUBSTITUTE_PRICE,
            externality_scale: EXTERNALITY_SCALE,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.num_samples < 2 {
            return Err(SolveError::InvalidDomain(format!(
                "need at least 2 samples, got {}",
                self.num_samples
            )));
        }
        if !self.price_min.is_finite() || !self.price_max.is_finite() {
            return Err(SolveError::InvalidDomain(
                "price bounds must be finite".to_string(),
            ));
        }
        if self.price_max <= self.price_min {
            return Err(SolveError::InvalidDomain(format!(
                "price_max ({}) must exceed price_min ({})",
                self.price_max, self.price_min
            )));
        }
        if self.externality_scale == 0.0 || !self.externality_scale.is_finite() {
            return Err(SolveError::InvalidDomain(
                "externality_scale must be a nonzero finite number".to_string(),
            ));
        }
        Ok(())
    }

    /// Distance between adjacent price samples
    pub fn step(&self) -> f64 {
        (self.price_max - self.price_min) / (self.num_samples - 1) as f64
    }
}

/// Evenly spaced price samples over `[price_min, price_max]`
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDomain {
    prices: Vec<f64>,
    step: f64,
}

impl PriceDomain {
    /// Sample `config.num_samples` prices; the last sample is exactly `price_max`.
    pub fn new(config: &ModelConfig) -> Result<Self, SolveError> {
        config.validate()?;

        let step = config.step();
        let last = config.num_samples - 1;
        let prices = (0..config.num_samples)
            .map(|i| {
                if i == last {
                    config.price_max
                } else {
                    config.price_min + i as f64 * step
                }
            })
            .collect();

        Ok(PriceDomain { prices, step })
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn first(&self) -> f64 {
        self.prices[0]
    }

    pub fn last(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.first() && price <= self.last()
    }
}
