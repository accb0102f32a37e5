//! Risk report assembly and rendering.
//!
//! A [`RiskReport`] bundles the simulation inputs and the computed metrics
//! into one serializable structure, and renders it either as pretty JSON or
//! as the sectioned console text the CLI prints.

use chrono::{DateTime, Utc};
use hobart_risk::{AnnualizedMetrics, PathSummary, RiskMetrics};
use hobart_sim::MomentModel;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A complete risk report for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Asset symbols in portfolio order.
    pub symbols: Vec<String>,

    /// Portfolio weights, aligned with `symbols`.
    pub weights: Vec<f64>,

    /// Number of single-day simulations behind the metrics.
    pub n_simulations: usize,

    /// Daily portfolio return metrics.
    pub metrics: RiskMetrics,

    /// Annualized return, volatility and Sharpe ratio.
    pub annualized: AnnualizedMetrics,

    /// Multi-day path summary, when paths were generated.
    pub paths: Option<PathSummary>,
}

impl RiskReport {
    /// Assemble a report stamped with the current time.
    pub fn new(
        symbols: Vec<String>,
        weights: Vec<f64>,
        n_simulations: usize,
        metrics: RiskMetrics,
        annualized: AnnualizedMetrics,
        paths: Option<PathSummary>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            symbols,
            weights,
            n_simulations,
            metrics,
            annualized,
            paths,
        }
    }

    /// Render the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`ReportError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the report as sectioned console text.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(60);
        let m = &self.metrics;

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "MONTE CARLO RESULTS ({} simulations)",
            group_thousands(self.n_simulations)
        );
        let _ = writeln!(out, "{rule}");

        let _ = writeln!(out, "\nDAILY STATISTICS:");
        let _ = writeln!(out, "  Expected Return:        {:>8.4}%", m.mean * 100.0);
        let _ = writeln!(out, "  Median Return:          {:>8.4}%", m.median * 100.0);
        let _ = writeln!(out, "  Volatility:             {:>8.4}%", m.std_dev * 100.0);

        let _ = writeln!(out, "\nRISK METRICS:");
        let _ = writeln!(out, "  Value at Risk (95%):    {:>8.4}%", m.var_95 * 100.0);
        let _ = writeln!(out, "  Value at Risk (99%):    {:>8.4}%", m.var_99 * 100.0);
        let _ = writeln!(out, "  CVaR (95%):             {:>8.4}%", m.cvar_95 * 100.0);

        let _ = writeln!(out, "\nPROBABILITIES:");
        let _ = writeln!(out, "  Probability of Loss:    {:>8.2}%", m.prob_loss * 100.0);
        let _ = writeln!(out, "  Probability of Gain:    {:>8.2}%", m.prob_gain * 100.0);

        let _ = writeln!(out, "\nEXTREMES:");
        let _ = writeln!(out, "  Best Simulation:        {:>8.4}%", m.max_gain * 100.0);
        let _ = writeln!(out, "  Worst Simulation:       {:>8.4}%", m.max_loss * 100.0);

        let _ = writeln!(out, "\nANNUALIZED (252 trading days):");
        let _ = writeln!(
            out,
            "  Expected Return:        {:>8.2}%",
            self.annualized.annual_return * 100.0
        );
        let _ = writeln!(
            out,
            "  Volatility:             {:>8.2}%",
            self.annualized.annual_volatility * 100.0
        );
        let _ = writeln!(
            out,
            "  Sharpe Ratio:           {:>8.2}",
            self.annualized.sharpe_ratio
        );

        let _ = writeln!(out, "{rule}");

        if let Some(paths) = &self.paths {
            let _ = writeln!(out, "\nPATH ANALYSIS:");
            let _ = writeln!(
                out,
                "  Starting Value:         ${:>12}",
                format_dollars(paths.initial_value)
            );
            let _ = writeln!(
                out,
                "  Mean Final Value:       ${:>12}",
                format_dollars(paths.mean_final)
            );
            let _ = writeln!(
                out,
                "  Median Final Value:     ${:>12}",
                format_dollars(paths.median_final)
            );
            let _ = writeln!(
                out,
                "  Best Scenario:          ${:>12}",
                format_dollars(paths.best_final)
            );
            let _ = writeln!(
                out,
                "  Worst Scenario:         ${:>12}",
                format_dollars(paths.worst_final)
            );
            let _ = writeln!(
                out,
                "  % Profitable Paths:     {:>11.1}%",
                paths.prob_profitable * 100.0
            );
        }

        out
    }
}

/// Render the per-asset historical statistics and the correlation matrix.
///
/// `symbols` must align with the model's asset order; extra or missing
/// symbols simply truncate the shorter side.
pub fn render_historical_statistics(model: &MomentModel, symbols: &[String]) -> String {
    let mut out = String::new();
    let volatilities = model.volatilities();
    let correlation = model.correlation();

    let _ = writeln!(out, "Historical Statistics (Daily):");
    let _ = writeln!(out, "{:<8} {:<15} {}", "Symbol", "Mean Return", "Volatility");
    let _ = writeln!(out, "{}", "-".repeat(45));
    for (i, symbol) in symbols.iter().enumerate().take(model.n_assets()) {
        let _ = writeln!(
            out,
            "{:<8} {:>6.4}%        {:>6.4}%",
            symbol,
            model.mean()[i] * 100.0,
            volatilities[i] * 100.0
        );
    }

    let _ = writeln!(out, "\nCorrelation Matrix:");
    let _ = write!(out, "{:<8}", "");
    for symbol in symbols.iter().take(model.n_assets()) {
        let _ = write!(out, "{symbol:>8}");
    }
    let _ = writeln!(out);
    for (i, symbol) in symbols.iter().enumerate().take(model.n_assets()) {
        let _ = write!(out, "{symbol:<8}");
        for j in 0..model.n_assets() {
            let _ = write!(out, "{:>8.3}", correlation[[i, j]]);
        }
        let _ = writeln!(out);
    }

    out
}

/// Format a non-negative count with comma grouping (12345 -> "12,345").
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a dollar amount with comma grouping and two decimals.
fn format_dollars(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands((cents / 100) as usize);
    let fraction = cents % 100;
    if negative {
        format!("-{whole}.{fraction:02}")
    } else {
        format!("{whole}.{fraction:02}")
    }
}
