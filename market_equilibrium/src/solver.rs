use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::{Curve, LinearSchedule};
use crate::domain::{ModelConfig, PriceDomain};
use crate::error::SolveError;
use crate::params::{MarketParameters, Parameter};

/// The sample where demand and supply come closest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumPoint {
    /// Position in the price domain
    pub index: usize,
    pub price: f64,
    /// Supply at `price`
    pub quantity: f64,
}

/// Both sampled curves plus their equilibrium
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSolution {
    pub demand: Curve,
    pub supply: Curve,
    pub equilibrium: EquilibriumPoint,
}

impl MarketSolution {
    /// Gap between demand and supply at the equilibrium sample
    pub fn residual(&self) -> f64 {
        let i = self.equilibrium.index;
        (self.demand.points()[i].quantity - self.supply.points()[i].quantity).abs()
    }
}

/// Divide both slopes by `market_flexibility`, rejecting zero or non-finite divisors.
pub fn adjusted_slopes(params: &MarketParameters) -> Result<(f64, f64), SolveError> {
    let flexibility = params.market_flexibility;
    if flexibility == 0.0 || !flexibility.is_finite() {
        return Err(SolveError::InvalidParameter {
            name: Parameter::MarketFlexibility.name(),
            value: flexibility,
        });
    }
    Ok((
        params.demand_slope / flexibility,
        params.supply_slope / flexibility,
    ))
}

/// Sampled supply/demand equilibrium solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumSolver {
    config: ModelConfig,
}

impl Default for EquilibriumSolver {
    fn default() -> Self {
        EquilibriumSolver {
            config: ModelConfig::default(),
        }
    }
}

impl EquilibriumSolver {
    pub fn new(config: ModelConfig) -> Result<Self, SolveError> {
        config.validate()?;
        Ok(EquilibriumSolver { config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Demand and supply lines for a parameter set, before sampling
    pub fn schedules(
        &self,
        params: &MarketParameters,
    ) -> Result<(LinearSchedule, LinearSchedule), SolveError> {
        let (demand_slope, supply_slope) = adjusted_slopes(params)?;
        Ok((
            LinearSchedule::demand(params, &self.config, demand_slope),
            LinearSchedule::supply(params, &self.config, supply_slope),
        ))
    }

    /// Sample both curves and pick the sample minimising |demand - supply|.
    ///
    /// Ties resolve to the lowest price. The equilibrium quantity is read
    /// from the supply curve.
    pub fn solve(&self, params: &MarketParameters) -> Result<MarketSolution, SolveError> {
        let (demand_schedule, supply_schedule) = self.schedules(params)?;
        let domain = PriceDomain::new(&self.config)?;

        let demand = Curve::sample(&domain, &demand_schedule);
        let supply = Curve::sample(&domain, &supply_schedule);

        let index = closest_index(&demand, &supply);
        let point = supply.points()[index];
        let equilibrium = EquilibriumPoint {
            index,
            price: point.price,
            quantity: point.quantity,
        };

        debug!(
            index,
            price = equilibrium.price,
            quantity = equilibrium.quantity,
            "sampled equilibrium"
        );

        Ok(MarketSolution {
            demand,
            supply,
            equilibrium,
        })
    }
}

/// Solve with the default model constants
pub fn solve(params: &MarketParameters) -> Result<MarketSolution, SolveError> {
    EquilibriumSolver::default().solve(params)
}

// First index of the smallest absolute gap; curves share a domain so are never empty.
fn closest_index(demand: &Curve, supply: &Curve) -> usize {
    let mut best_index = 0;
    let mut best_gap = f64::INFINITY;

    for (i, (d, s)) in demand.quantities().zip(supply.quantities()).enumerate() {
        let gap = (d - s).abs();
        if gap < best_gap {
            best_index = i;
            best_gap = gap;
        }
    }

    best_index
}
