//! Batch solving: one-parameter sweeps and seeded Monte Carlo scenarios.
//!
//! Every scenario is an independent solve, so batches fan out over rayon's
//! thread pool. Output order always matches input order, and Monte Carlo runs
//! derive their RNG from `seed + run`, so results do not depend on the number
//! of threads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::SolveError;
use crate::exact::Comparison;
use crate::params::{MarketParameters, Parameter};
use crate::solver::{EquilibriumPoint, EquilibriumSolver};

/// One solved value of a swept parameter
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub value: f64,
    pub result: Result<EquilibriumPoint, SolveError>,
}

/// Solve `base` once per value of `parameter`, in parallel.
///
/// A failing value (e.g. zero flexibility) is recorded and does not stop the
/// remaining values.
pub fn sweep(
    solver: &EquilibriumSolver,
    base: &MarketParameters,
    parameter: Parameter,
    values: &[f64],
) -> Vec<SweepPoint> {
    info!(%parameter, count = values.len(), "starting parameter sweep");

    let points: Vec<SweepPoint> = values
        .par_iter()
        .map(|&value| {
            let params = base.with(parameter, value);
            SweepPoint {
                value,
                result: solver.solve(&params).map(|s| s.equilibrium),
            }
        })
        .collect();

    info!(
        %parameter,
        failed = points.iter().filter(|p| p.result.is_err()).count(),
        "parameter sweep complete"
    );
    points
}

/// A randomly drawn market and its solution
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub run: usize,
    pub params: MarketParameters,
    pub result: Result<EquilibriumPoint, SolveError>,
    /// Sampled vs analytic, when the analytic crossing is attainable
    pub comparison: Option<Comparison>,
}

/// Draw every parameter uniformly from its suggested grid
pub fn sample_parameters<R: Rng>(rng: &mut R) -> MarketParameters {
    let mut params = MarketParameters::default();
    for parameter in Parameter::ALL {
        let k = rng.random_range(0..parameter.grid_len());
        params.set(parameter, parameter.grid_value(k));
    }
    params
}

/// Solve `runs` random markets drawn from the suggested input ranges.
pub fn monte_carlo(solver: &EquilibriumSolver, runs: usize, seed: u64) -> Vec<Scenario> {
    info!(runs, seed, "starting monte carlo");

    (0..runs)
        .into_par_iter()
        .map(|run| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(run as u64));
            let params = sample_parameters(&mut rng);

            let solution = solver.solve(&params);
            let comparison = match (&solution, solver.solve_exact(&params)) {
                (Ok(sampled), Ok(exact)) if exact.is_attainable() => {
                    Some(solver.compare(sampled, &exact))
                }
                _ => None,
            };

            Scenario {
                run,
                params,
                result: solution.map(|s| s.equilibrium),
                comparison,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MeanStd {
    /// Population statistics; all zeros for an empty slice
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return MeanStd {
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        MeanStd {
            mean,
            std: variance.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Aggregate statistics over a batch of solves
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    pub runs: usize,
    pub failed: usize,
    pub price: MeanStd,
    pub quantity: MeanStd,
    /// Only present when comparisons were made
    pub price_gap: Option<MeanStd>,
}

impl SweepSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a Result<EquilibriumPoint, SolveError>>,
    {
        let mut runs = 0;
        let mut prices = Vec::new();
        let mut quantities = Vec::new();

        for result in results {
            runs += 1;
            if let Ok(point) = result {
                prices.push(point.price);
                quantities.push(point.quantity);
            }
        }

        SweepSummary {
            runs,
            failed: runs - prices.len(),
            price: MeanStd::from_values(&prices),
            quantity: MeanStd::from_values(&quantities),
            price_gap: None,
        }
    }

    pub fn from_sweep(points: &[SweepPoint]) -> Self {
        Self::from_results(points.iter().map(|p| &p.result))
    }

    pub fn from_scenarios(scenarios: &[Scenario]) -> Self {
        let gaps: Vec<f64> = scenarios
            .iter()
            .filter_map(|s| s.comparison.map(|c| c.price_gap))
            .collect();

        SweepSummary {
            price_gap: (!gaps.is_empty()).then(|| MeanStd::from_values(&gaps)),
            ..Self::from_results(scenarios.iter().map(|s| &s.result))
        }
    }

    pub fn print_summary(&self, label: &str) {
        println!("\n{}", label);
        println!("  Runs: {} ({} failed)", self.runs, self.failed);
        println!(
            "  Price: {:.2} (±{:.2}) [{:.2}, {:.2}]",
            self.price.mean, self.price.std, self.price.min, self.price.max
        );
        println!(
            "  Quantity: {:.2} (±{:.2}) [{:.2}, {:.2}]",
            self.quantity.mean, self.quantity.std, self.quantity.min, self.quantity.max
        );
        if let Some(gap) = &self.price_gap {
            println!(
                "  Sampled vs exact price gap: {:.4} (max {:.4})",
                gap.mean, gap.max
            );
        }
    }
}
