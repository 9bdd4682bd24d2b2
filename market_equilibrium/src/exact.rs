//! Closed-form intersection of the demand and supply lines.
//!
//! Runs alongside the sampled search so the two can be compared; the sampled
//! [`EquilibriumPoint`](crate::EquilibriumPoint) remains the reported result.

use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::params::MarketParameters;
use crate::solver::{EquilibriumSolver, MarketSolution};

/// Analytic crossing of the unclamped lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExactEquilibrium {
    pub price: f64,
    pub quantity: f64,
    /// Crossing lies inside the sampled price domain
    pub in_domain: bool,
    /// Crossing is above zero quantity, so clamping does not move it
    pub non_negative: bool,
}

impl ExactEquilibrium {
    /// The clamped sampled curves also cross here
    pub fn is_attainable(&self) -> bool {
        self.in_domain && self.non_negative
    }
}

/// Sampled result measured against the analytic one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub price_gap: f64,
    pub quantity_gap: f64,
    /// Sampled price is no more than one domain step from the exact price
    pub within_step: bool,
}

impl EquilibriumSolver {
    /// Solve `demand(P) = supply(P)` in closed form on the unclamped lines.
    pub fn solve_exact(&self, params: &MarketParameters) -> Result<ExactEquilibrium, SolveError> {
        let (demand, supply) = self.schedules(params)?;

        let slope_gap = supply.slope - demand.slope;
        if slope_gap == 0.0 {
            return Err(SolveError::NoIntersection);
        }

        let price = (demand.offset() - supply.offset()) / slope_gap;
        let quantity = supply.raw_quantity(price);
        let config = self.config();

        Ok(ExactEquilibrium {
            price,
            quantity,
            in_domain: price >= config.price_min && price <= config.price_max,
            non_negative: quantity >= 0.0,
        })
    }

    pub fn compare(&self, sampled: &MarketSolution, exact: &ExactEquilibrium) -> Comparison {
        let price_gap = (sampled.equilibrium.price - exact.price).abs();
        Comparison {
            price_gap,
            quantity_gap: (sampled.equilibrium.quantity - exact.quantity).abs(),
            within_step: price_gap <= self.config().step(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_market_crosses_at_twenty_sixty() {
        let exact = EquilibriumSolver::default()
            .solve_exact(&MarketParameters::default())
            .unwrap();

        assert_relative_eq!(exact.price, 20.0);
        assert_relative_eq!(exact.quantity, 60.0);
        assert!(exact.is_attainable());
    }

    #[test]
    fn tax_raises_price_and_lowers_quantity() {
        let solver = EquilibriumSolver::default();
        let exact = solver
            .solve_exact(&MarketParameters {
                tax: 8.0,
                ..Default::default()
            })
            .unwrap();

        // 100 - 2P = 12 + 2P
        assert_relative_eq!(exact.price, 22.0);
        assert_relative_eq!(exact.quantity, 56.0);
    }

    #[test]
    fn parallel_lines_have_no_intersection() {
        let params = MarketParameters {
            demand_slope: 0.0,
            supply_slope: 0.0,
            ..Default::default()
        };
        assert_eq!(
            EquilibriumSolver::default().solve_exact(&params),
            Err(SolveError::NoIntersection)
        );
    }

    #[test]
    fn crossing_below_zero_is_not_attainable() {
        let params = MarketParameters {
            demand_intercept: 10.0,
            supply_intercept: 0.0,
            tax: 40.0,
            ..Default::default()
        };
        let exact = EquilibriumSolver::default().solve_exact(&params).unwrap();

        assert!(!exact.non_negative);
        assert!(!exact.is_attainable());
    }

    #[test]
    fn sampled_result_is_within_one_step_of_exact() {
        let solver = EquilibriumSolver::default();
        let params = MarketParameters {
            subsidy: 4.0,
            externality: 12.0,
            substitute_price: 35.0,
            market_flexibility: 1.3,
            ..Default::default()
        };
        let sampled = solver.solve(&params).unwrap();
        let exact = solver.solve_exact(&params).unwrap();

        assert!(exact.is_attainable());
        assert!(solver.compare(&sampled, &exact).within_step);
    }
}
