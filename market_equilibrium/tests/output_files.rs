use std::fs;

use market_equilibrium::config::RunConfig;
use market_equilibrium::output::{
    ExactSummary, SolutionOutput, write_sweep_csv, write_sweep_summary,
};
use market_equilibrium::sweep::{SweepSummary, sweep};
use market_equilibrium::{EquilibriumSolver, MarketParameters, Parameter};
use tempfile::TempDir;

fn solved_output(params: MarketParameters) -> SolutionOutput {
    let solver = EquilibriumSolver::default();
    let solution = solver.solve(&params).unwrap();
    let equilibrium = solver.solve_exact(&params).unwrap();
    let comparison = solver.compare(&solution, &equilibrium);

    SolutionOutput::from_solution(
        params,
        *solver.config(),
        solution,
        Some(ExactSummary {
            equilibrium,
            comparison,
        }),
    )
}

#[test]
fn test_write_all_creates_curves_and_summary() {
    let dir = TempDir::new().unwrap();
    let output = solved_output(MarketParameters::default());

    output.write_all(dir.path(), true, true).unwrap();

    let mut reader = csv::Reader::from_path(dir.path().join("curves.csv")).unwrap();
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(String::from)
        .collect();
    assert_eq!(headers, vec!["price", "demand", "supply"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 500);

    let first_price: f64 = rows[0][0].parse().unwrap();
    let last_price: f64 = rows[499][0].parse().unwrap();
    assert_eq!(first_price, 1.0);
    assert_eq!(last_price, 100.0);

    // Row at the equilibrium index carries the reported supply quantity
    let eq = output.equilibrium;
    let supply_at_eq: f64 = rows[eq.index][2].parse().unwrap();
    assert_eq!(supply_at_eq, eq.quantity);

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["equilibrium"]["index"], eq.index);
    assert_eq!(summary["reference_lines"][1]["orientation"], "horizontal");
    assert_eq!(summary["exact"]["equilibrium"]["price"], 20.0);
    assert!(summary["metadata"]["timestamp"].is_string());
}

#[test]
fn test_write_all_respects_disabled_outputs() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested/run");

    solved_output(MarketParameters::default())
        .write_all(&target, false, true)
        .unwrap();

    assert!(!target.join("curves.csv").exists());
    assert!(target.join("summary.json").exists());
}

#[test]
fn test_sweep_csv_records_failures() {
    let dir = TempDir::new().unwrap();
    let points = sweep(
        &EquilibriumSolver::default(),
        &MarketParameters::default(),
        Parameter::MarketFlexibility,
        &[1.0, 0.0],
    );
    let path = dir.path().join("sweep.csv");

    write_sweep_csv(&points, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 2);
    assert!(rows[0][3].is_empty());
    assert!(rows[1][1].is_empty());
    assert!(rows[1][3].contains("market_flexibility"));

    let summary_path = dir.path().join("sweep_summary.json");
    write_sweep_summary(&SweepSummary::from_sweep(&points), &summary_path).unwrap();
    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(summary_path).unwrap()).unwrap();
    assert_eq!(summary["failed"], 1);
}

#[test]
fn test_config_file_drives_the_solve() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.toml");
    fs::write(
        &path,
        "[market]\ntax = 8\n\n[output]\ndirectory = \"out\"\nsave_curves = false\n",
    )
    .unwrap();

    let config = RunConfig::load(&path).unwrap();
    let solver = EquilibriumSolver::new(config.model).unwrap();
    let exact = solver.solve_exact(&config.market).unwrap();

    assert_eq!(config.market.tax, 8.0);
    assert_eq!(exact.price, 22.0);
    assert!(!config.output.unwrap().save_curves);
}

#[test]
fn test_missing_config_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = RunConfig::load(dir.path().join("absent.toml"));
    assert!(matches!(
        result,
        Err(market_equilibrium::ConfigError::Io(_))
    ));
}
