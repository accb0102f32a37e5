//! Run configuration for a simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`RunConfig::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No symbols were configured.
    #[error("At least one symbol is required")]
    NoSymbols,

    /// Symbol and weight counts differ.
    #[error("Weight count {weights} does not match symbol count {symbols}")]
    WeightMismatch {
        /// Number of configured symbols.
        symbols: usize,
        /// Number of configured weights.
        weights: usize,
    },

    /// A count parameter that must be positive is zero.
    #[error("{field} must be positive")]
    ZeroCount {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Configuration for one end-to-end simulation run.
///
/// Weights are taken as given and are not required to sum to one; a weight
/// vector summing to 0.9 simulates a portfolio with 10% held out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Asset symbols to simulate.
    pub symbols: Vec<String>,

    /// Portfolio weights, aligned with `symbols`.
    pub weights: Vec<f64>,

    /// Number of single-day Monte Carlo draws.
    pub n_simulations: usize,

    /// Trading days of history to estimate moments from (also the horizon
    /// of generated paths).
    pub historical_days: usize,

    /// Number of multi-day wealth paths to generate.
    pub n_paths: usize,

    /// Starting portfolio value in dollars.
    pub initial_investment: f64,

    /// Seed for the random number generator; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    /// The stock/bond/gold demo portfolio: 40% SPY, 40% TLT, 20% GLD.
    fn default() -> Self {
        Self {
            symbols: vec!["SPY".to_string(), "TLT".to_string(), "GLD".to_string()],
            weights: vec![0.4, 0.4, 0.2],
            n_simulations: 10_000,
            historical_days: 252,
            n_paths: 100,
            initial_investment: 10_000.0,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Check structural validity: at least one symbol, weights aligned with
    /// symbols, and positive simulation counts.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        if self.weights.len() != self.symbols.len() {
            return Err(ConfigError::WeightMismatch {
                symbols: self.symbols.len(),
                weights: self.weights.len(),
            });
        }
        if self.n_simulations == 0 {
            return Err(ConfigError::ZeroCount {
                field: "n_simulations",
            });
        }
        if self.historical_days == 0 {
            return Err(ConfigError::ZeroCount {
                field: "historical_days",
            });
        }
        if self.n_paths == 0 {
            return Err(ConfigError::ZeroCount { field: "n_paths" });
        }
        Ok(())
    }
}
