//! Export of solved markets for the rendering side.
//!
//! Curves go to CSV (one row per price sample); the equilibrium, reference
//! lines and run metadata go to JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::domain::ModelConfig;
use crate::error::OutputError;
use crate::exact::{Comparison, ExactEquilibrium};
use crate::params::MarketParameters;
use crate::solver::{EquilibriumPoint, MarketSolution};
use crate::sweep::{SweepPoint, SweepSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Dashed guide line through the equilibrium point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub orientation: Orientation,
    pub value: f64,
    pub label: String,
}

impl ReferenceLine {
    /// Vertical line at the equilibrium price and horizontal line at its quantity
    pub fn through(point: &EquilibriumPoint) -> [ReferenceLine; 2] {
        [
            ReferenceLine {
                orientation: Orientation::Vertical,
                value: point.price,
                label: format!("Price: {:.2}", point.price),
            },
            ReferenceLine {
                orientation: Orientation::Horizontal,
                value: point.quantity,
                label: format!("Quantity: {:.2}", point.quantity),
            },
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub parameters: MarketParameters,
    pub model: ModelConfig,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExactSummary {
    pub equilibrium: ExactEquilibrium,
    pub comparison: Comparison,
}

/// Everything the renderer needs for one solved market
#[derive(Debug, Clone, Serialize)]
pub struct SolutionOutput {
    pub metadata: OutputMetadata,
    pub equilibrium: EquilibriumPoint,
    pub reference_lines: [ReferenceLine; 2],
    pub exact: Option<ExactSummary>,
    #[serde(skip)]
    pub demand: Curve,
    #[serde(skip)]
    pub supply: Curve,
}

impl SolutionOutput {
    pub fn from_solution(
        parameters: MarketParameters,
        model: ModelConfig,
        solution: MarketSolution,
        exact: Option<ExactSummary>,
    ) -> Self {
        let MarketSolution {
            demand,
            supply,
            equilibrium,
        } = solution;

        SolutionOutput {
            metadata: OutputMetadata {
                parameters,
                model,
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
            equilibrium,
            reference_lines: ReferenceLine::through(&equilibrium),
            exact,
            demand,
            supply,
        }
    }

    /// Write `price,demand,supply` rows, one per sample
    pub fn write_curves_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let mut wtr = csv::Writer::from_path(path)?;

        wtr.write_record(["price", "demand", "supply"])?;
        for (d, s) in self.demand.iter().zip(self.supply.iter()) {
            wtr.write_record(&[
                d.price.to_string(),
                d.quantity.to_string(),
                s.quantity.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn write_summary_json<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        write_json(self, path)
    }

    /// Write enabled outputs to a directory
    ///
    /// Creates:
    /// - curves.csv
    /// - summary.json
    pub fn write_all<P: AsRef<Path>>(
        &self,
        dir: P,
        save_curves: bool,
        save_summary: bool,
    ) -> Result<(), OutputError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        if save_curves {
            self.write_curves_csv(dir.join("curves.csv"))?;
        }
        if save_summary {
            self.write_summary_json(dir.join("summary.json"))?;
        }

        Ok(())
    }
}

/// Write `value,price,quantity,error` rows; failed values leave price and quantity empty
pub fn write_sweep_csv<P: AsRef<Path>>(points: &[SweepPoint], path: P) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["value", "price", "quantity", "error"])?;
    for point in points {
        let row = match &point.result {
            Ok(eq) => [
                point.value.to_string(),
                eq.price.to_string(),
                eq.quantity.to_string(),
                String::new(),
            ],
            Err(e) => [
                point.value.to_string(),
                String::new(),
                String::new(),
                e.to_string(),
            ],
        };
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_sweep_summary<P: AsRef<Path>>(
    summary: &SweepSummary,
    path: P,
) -> Result<(), OutputError> {
    write_json(summary, path)
}

fn write_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
