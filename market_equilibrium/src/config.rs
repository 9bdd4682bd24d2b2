//! TOML run configuration shared by the binaries.
//!
//! ```toml
//! [market]
//! tax = 5.0
//!
//! [output]
//! directory = "results/taxed"
//!
//! [sweep]
//! parameter = "tax"
//! values = [0.0, 5.0, 10.0]
//! ```
//!
//! Every section is optional; missing market fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::ModelConfig;
use crate::error::ConfigError;
use crate::params::{MarketParameters, Parameter};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub market: MarketParameters,
    pub model: ModelConfig,
    pub output: Option<OutputSettings>,
    pub sweep: Option<SweepConfig>,
    pub monte_carlo: Option<MonteCarloConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub directory: PathBuf,
    #[serde(default = "default_true")]
    pub save_curves: bool,
    #[serde(default = "default_true")]
    pub save_summary: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    pub parameter: String,
    pub values: Vec<f64>,
}

impl SweepConfig {
    pub fn parameter(&self) -> Result<Parameter, ConfigError> {
        self.parameter.parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonteCarloConfig {
    pub runs: usize,
    #[serde(default)]
    pub seed: u64,
}

fn default_true() -> bool {
    true
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a config, resolving the sweep parameter name eagerly
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(contents)?;
        if let Some(sweep) = &config.sweep {
            sweep.parameter()?;
        }
        Ok(config)
    }
}
