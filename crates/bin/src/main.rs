//! Hobart CLI binary.
//!
//! Command-line interface for the Hobart Monte Carlo portfolio risk engine.

use clap::{Parser, Subcommand};
use hobart::{RunConfig, SimulationSession};
use hobart_data::{YahooQuoteProvider, returns::fetch_returns};
use hobart_output::{
    RiskReport, render_historical_statistics, write_paths_csv, write_report_json,
};
use hobart_risk::{AnnualizedMetrics, PathSummary, RiskMetrics, TRADING_DAYS_PER_YEAR};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::path::PathBuf;
use std::process;
use std::time::Duration as StdDuration;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: Monte Carlo portfolio risk engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch market data and run a full risk simulation
    Simulate {
        /// Asset symbols, comma-separated
        #[arg(long, value_delimiter = ',')]
        symbols: Option<Vec<String>>,

        /// Portfolio weights, comma-separated and aligned with symbols
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,

        /// Number of single-day Monte Carlo draws
        #[arg(long)]
        simulations: Option<usize>,

        /// Trading days of history to fit on (also the path horizon)
        #[arg(long)]
        days: Option<usize>,

        /// Number of multi-day wealth paths
        #[arg(long)]
        paths: Option<usize>,

        /// Starting portfolio value in dollars
        #[arg(long)]
        initial: Option<f64>,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the generated wealth paths to a CSV file
        #[arg(long)]
        export_paths: Option<PathBuf>,

        /// Write the full report to a JSON file
        #[arg(long)]
        export_report: Option<PathBuf>,
    },

    /// Run the simulation on synthetic offline data
    Demo {
        /// Number of single-day Monte Carlo draws
        #[arg(long, default_value = "10000")]
        simulations: usize,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            symbols,
            weights,
            simulations,
            days,
            paths,
            initial,
            seed,
            format,
            export_paths,
            export_report,
        } => {
            let defaults = RunConfig::default();
            let config = RunConfig {
                symbols: symbols.unwrap_or(defaults.symbols),
                weights: weights.unwrap_or(defaults.weights),
                n_simulations: simulations.unwrap_or(defaults.n_simulations),
                historical_days: days.unwrap_or(defaults.historical_days),
                n_paths: paths.unwrap_or(defaults.n_paths),
                initial_investment: initial.unwrap_or(defaults.initial_investment),
                seed,
            };
            simulate(config, &format, export_paths, export_report).await?;
        }
        Commands::Demo {
            simulations,
            seed,
            format,
        } => {
            demo(simulations, seed, &format)?;
        }
    }

    Ok(())
}

async fn simulate(
    config: RunConfig,
    format: &str,
    export_paths: Option<PathBuf>,
    export_report: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let is_json = format.to_lowercase() == "json";

    let provider = YahooQuoteProvider::new()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message(format!("Fetching {} symbols...", config.symbols.len()));

    let panel = match fetch_returns(&provider, &config.symbols, config.historical_days).await {
        Ok(p) => {
            pb.finish_with_message(format!(
                "Fetched {} symbols ({} aligned trading days)",
                p.n_assets(),
                p.n_obs()
            ));
            p
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(format!("Failed to fetch market data: {}", e).into());
        }
    };

    let session =
        SimulationSession::fit(panel.returns(), Array1::from(config.weights.clone()))?;

    if !is_json {
        println!();
        println!(
            "{}",
            render_historical_statistics(session.model(), &config.symbols)
        );
    }

    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let draws = session.simulate_returns(config.n_simulations, &mut rng)?;
    let metrics = RiskMetrics::from_returns(draws.view())?;
    let annualized = AnnualizedMetrics::from_daily(&metrics, TRADING_DAYS_PER_YEAR);

    let paths = session.generate_paths(
        config.n_paths,
        config.historical_days,
        config.initial_investment,
        &mut rng,
    )?;
    let summary = PathSummary::from_paths(paths.view(), config.initial_investment)?;

    let report = RiskReport::new(
        config.symbols,
        config.weights,
        config.n_simulations,
        metrics,
        annualized,
        Some(summary),
    );

    if is_json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render_text());
    }

    if let Some(path) = export_paths {
        write_paths_csv(&path, paths.view())?;
        println!("Wrote paths to {}", path.display());
    }
    if let Some(path) = export_report {
        write_report_json(&path, &report)?;
        println!("Wrote report to {}", path.display());
    }

    Ok(())
}

fn demo(n_simulations: usize, seed: u64, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let is_json = format.to_lowercase() == "json";
    let (returns, symbols) = synthetic_returns(252);
    let weights = vec![0.4, 0.4, 0.2];

    let session = SimulationSession::fit(&returns, Array1::from(weights.clone()))?;

    if !is_json {
        println!("\nDemo mode: synthetic return history, no market data fetched.\n");
        println!("{}", render_historical_statistics(session.model(), &symbols));
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let draws = session.simulate_returns(n_simulations, &mut rng)?;
    let metrics = RiskMetrics::from_returns(draws.view())?;
    let annualized = AnnualizedMetrics::from_daily(&metrics, TRADING_DAYS_PER_YEAR);

    let paths = session.generate_paths(100, 252, 10_000.0, &mut rng)?;
    let summary = PathSummary::from_paths(paths.view(), 10_000.0)?;

    let report = RiskReport::new(
        symbols,
        weights,
        n_simulations,
        metrics,
        annualized,
        Some(summary),
    );

    if is_json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render_text());
    }

    Ok(())
}

/// Synthetic daily returns for three pseudo-assets with distinct cycles,
/// so the estimated covariance is full-rank and mildly correlated.
fn synthetic_returns(n_periods: usize) -> (Array2<f64>, Vec<String>) {
    let symbols = vec![
        "STOCKS".to_string(),
        "BONDS".to_string(),
        "GOLD".to_string(),
    ];

    let mut returns = Array2::<f64>::zeros((n_periods, symbols.len()));
    for t in 0..n_periods {
        let time = t as f64 / n_periods as f64;

        // Stocks: higher drift and volatility
        returns[[t, 0]] = 0.0004 + 0.010 * (time * 9.0).sin() + 0.003 * (time * 31.0).sin();

        // Bonds: counter-cyclical to stocks, low volatility
        returns[[t, 1]] = 0.0002 - 0.004 * (time * 9.0).sin() + 0.001 * (time * 17.0).cos();

        // Gold: own cycle, loosely related to both
        returns[[t, 2]] = 0.0003 + 0.006 * (time * 5.0).cos() + 0.002 * (time * 23.0).sin();
    }

    (returns, symbols)
}
