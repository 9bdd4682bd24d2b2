use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use market_equilibrium::config::RunConfig;
use market_equilibrium::output::{ExactSummary, SolutionOutput};
use market_equilibrium::{EquilibriumSolver, MarketParameters, Parameter};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Solve a linear supply/demand market for one set of inputs.
///
/// Values come from the defaults, then the `[market]` section of `--config`,
/// then any parameter flags given here.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write curves.csv and summary.json into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also solve the crossing in closed form and compare
    #[arg(long)]
    exact: bool,

    #[arg(long)]
    demand_intercept: Option<f64>,
    #[arg(long)]
    demand_slope: Option<f64>,
    #[arg(long)]
    supply_intercept: Option<f64>,
    #[arg(long)]
    supply_slope: Option<f64>,
    #[arg(long)]
    tax: Option<f64>,
    #[arg(long)]
    subsidy: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    externality: Option<f64>,
    #[arg(long)]
    substitute_price: Option<f64>,
    #[arg(long)]
    market_flexibility: Option<f64>,
}

impl Cli {
    fn overrides(&self) -> [(Parameter, Option<f64>); 9] {
        [
            (Parameter::DemandIntercept, self.demand_intercept),
            (Parameter::DemandSlope, self.demand_slope),
            (Parameter::SupplyIntercept, self.supply_intercept),
            (Parameter::SupplySlope, self.supply_slope),
            (Parameter::Tax, self.tax),
            (Parameter::Subsidy, self.subsidy),
            (Parameter::Externality, self.externality),
            (Parameter::SubstitutePrice, self.substitute_price),
            (Parameter::MarketFlexibility, self.market_flexibility),
        ]
    }

    fn apply(&self, params: &mut MarketParameters) {
        for (parameter, value) in self.overrides() {
            if let Some(value) = value {
                params.set(parameter, value);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };

    let mut params = config.market;
    cli.apply(&mut params);

    for (parameter, value) in params.out_of_range() {
        let bounds = parameter.bounds();
        warn!(
            %parameter,
            value,
            min = bounds.min,
            max = bounds.max,
            "parameter outside suggested range"
        );
    }

    let solver = EquilibriumSolver::new(config.model)?;
    let solution = solver.solve(&params)?;

    println!("=== Market Equilibrium ===\n");
    for parameter in Parameter::ALL {
        println!("  {:<20} {}", parameter, params.get(parameter));
    }
    println!(
        "\nEquilibrium: price={:.2}, quantity={:.2} (sample {} of {})",
        solution.equilibrium.price,
        solution.equilibrium.quantity,
        solution.equilibrium.index + 1,
        solution.supply.len()
    );
    println!("Residual |Qd - Qs|: {:.4}", solution.residual());

    let exact = if cli.exact {
        let equilibrium = solver.solve_exact(&params)?;
        let comparison = solver.compare(&solution, &equilibrium);
        println!(
            "Exact crossing: price={:.4}, quantity={:.4}{}",
            equilibrium.price,
            equilibrium.quantity,
            if equilibrium.is_attainable() {
                ""
            } else {
                " (outside the clamped curves)"
            }
        );
        println!(
            "Sampled vs exact: Δprice={:.4}, Δquantity={:.4}",
            comparison.price_gap, comparison.quantity_gap
        );
        Some(ExactSummary {
            equilibrium,
            comparison,
        })
    } else {
        None
    };

    let settings = config.output.as_ref();
    let directory = cli
        .output
        .clone()
        .or_else(|| settings.map(|s| s.directory.clone()));

    if let Some(dir) = directory {
        let output = SolutionOutput::from_solution(params, *solver.config(), solution, exact);
        output.write_all(
            &dir,
            settings.is_none_or(|s| s.save_curves),
            settings.is_none_or(|s| s.save_summary),
        )?;
        println!("\nResults saved to: {}", dir.display());
    }

    Ok(())
}
