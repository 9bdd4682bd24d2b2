//! Linear supply/demand market equilibrium
//!
//! Nine market inputs (intercepts, slopes, tax, subsidy, externality,
//! substitute price and market flexibility) define a demand line and a supply
//! line. Both are sampled over a fixed price domain, clamped at zero quantity,
//! and the sample where they come closest is reported as the equilibrium.
//!
//! Key pieces:
//! - EquilibriumSolver: samples the curves and runs the nearest-crossing search
//! - Exact mode: closed-form crossing for comparison against the sampled result
//! - Sweeps: parameter sweeps and Monte Carlo batches over the input ranges
//!
//! Expected outcome for the default market:
//! - Demand 100 - 2P and supply 20 + 2P cross at P = 20, Q = 60
//! - The sampled equilibrium falls on the nearest price sample

pub mod config;
pub mod curve;
pub mod domain;
pub mod error;
pub mod exact;
pub mod output;
pub mod params;
pub mod solver;
pub mod sweep;

pub use curve::{Curve, CurvePoint, LinearSchedule};
pub use domain::{ModelConfig, PriceDomain};
pub use error::{ConfigError, OutputError, SolveError};
pub use exact::{Comparison, ExactEquilibrium};
pub use params::{Bounds, MarketParameters, Parameter};
pub use solver::{EquilibriumPoint, EquilibriumSolver, MarketSolution, solve};
