//! Batch Sweep Runner
//!
//! Runs the `[sweep]` and `[monte_carlo]` sections of a TOML run configuration.
//!
//! Usage:
//!   cargo run --release --bin run_sweep -- experiments/tax_sweep.toml

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use market_equilibrium::EquilibriumSolver;
use market_equilibrium::config::RunConfig;
use market_equilibrium::output::{write_sweep_csv, write_sweep_summary};
use market_equilibrium::sweep::{SweepSummary, monte_carlo, sweep};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(version, about = "Run parameter sweeps and Monte Carlo batches", long_about = None)]
struct Cli {
    /// TOML run configuration with a [sweep] and/or [monte_carlo] section
    config: PathBuf,

    /// Worker threads (defaults to rayon's choice)
    #[arg(short = 'j', long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    println!("=== Market Equilibrium Sweep Runner ===\n");
    println!("Loading config: {}\n", cli.config.display());

    let config = RunConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if config.sweep.is_none() && config.monte_carlo.is_none() {
        bail!("config has neither a [sweep] nor a [monte_carlo] section");
    }

    let solver = EquilibriumSolver::new(config.model)?;
    let output_dir = config.output.as_ref().map(|o| o.directory.clone());
    if let Some(dir) = &output_dir {
        fs::create_dir_all(dir)?;
    }

    if let Some(sweep_config) = &config.sweep {
        let parameter = sweep_config.parameter()?;
        println!("Parameter sweep: {} ∈ {:?}", parameter, sweep_config.values);

        let start = Instant::now();
        let points = sweep(&solver, &config.market, parameter, &sweep_config.values);
        let summary = SweepSummary::from_sweep(&points);

        for point in &points {
            match &point.result {
                Ok(eq) => println!(
                    "  {}={:.3} → price={:.2}, quantity={:.2}",
                    parameter, point.value, eq.price, eq.quantity
                ),
                Err(e) => println!("  {}={:.3} → failed: {}", parameter, point.value, e),
            }
        }
        summary.print_summary(&format!("Sweep over {}", parameter));
        println!("  Elapsed: {:.3}s", start.elapsed().as_secs_f64());

        if let Some(dir) = &output_dir {
            write_sweep_csv(&points, dir.join("sweep.csv"))?;
            write_sweep_summary(&summary, dir.join("sweep_summary.json"))?;
        }
    }

    if let Some(mc) = &config.monte_carlo {
        println!("\nMonte Carlo: {} runs (seed={})", mc.runs, mc.seed);

        let start = Instant::now();
        let scenarios = monte_carlo(&solver, mc.runs, mc.seed);
        let summary = SweepSummary::from_scenarios(&scenarios);

        summary.print_summary("Monte Carlo over suggested input ranges");
        println!("  Elapsed: {:.3}s", start.elapsed().as_secs_f64());

        if let Some(dir) = &output_dir {
            write_sweep_summary(&summary, dir.join("monte_carlo_summary.json"))?;
        }
    }

    if let Some(dir) = &output_dir {
        println!("\nResults saved to: {}", dir.display());
    }

    Ok(())
}
