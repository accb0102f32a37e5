//! Single-day Monte Carlo simulation.
//!
//! Draws independent samples from the fitted return distribution and
//! projects each through the portfolio weights into one scalar portfolio
//! return per trial.

use crate::moments::MomentModel;
use crate::mvn::{MvnDistribution, MvnError};
use ndarray::{Array1, Array2};
use rand::Rng;
use thiserror::Error;

/// Errors that can occur while running a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Weight vector length does not match the asset count
    #[error("Dimension mismatch: expected {expected} weights, got {actual}")]
    DimensionMismatch {
        /// Expected number of weights (asset count)
        expected: usize,
        /// Actual number of weights
        actual: usize,
    },

    /// The fitted covariance cannot be sampled from
    #[error("Invalid distribution: {0}")]
    Distribution(#[from] MvnError),

    /// Invalid simulation parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Monte Carlo engine for single-day portfolio return distributions.
///
/// Weights are applied exactly as given; they are not required to sum to 1
/// (a leveraged or partially invested book is the caller's responsibility).
#[derive(Debug)]
pub struct SimulationEngine {
    distribution: MvnDistribution,
    weights: Array1<f64>,
}

impl SimulationEngine {
    /// Create an engine for the given fitted model and portfolio weights.
    ///
    /// # Errors
    /// * [`SimulationError::DimensionMismatch`] if `weights.len()` differs
    ///   from the model's asset count
    /// * [`SimulationError::Distribution`] if the model covariance is not
    ///   symmetric positive semi-definite
    pub fn new(model: &MomentModel, weights: Array1<f64>) -> Result<Self, SimulationError> {
        if weights.len() != model.n_assets() {
            return Err(SimulationError::DimensionMismatch {
                expected: model.n_assets(),
                actual: weights.len(),
            });
        }

        let distribution = MvnDistribution::new(model.mean().clone(), model.covariance().clone())?;
        Ok(Self {
            distribution,
            weights,
        })
    }

    /// Portfolio weights the engine applies to each sampled return vector.
    pub const fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Run `n_simulations` independent trials.
    ///
    /// Each trial draws one return vector from the fitted distribution and
    /// reduces it to `sample · weights`. The output has length exactly
    /// `n_simulations`; for a degenerate weight vector selecting a single
    /// asset, the output equals that asset's sampled series element-wise.
    ///
    /// # Errors
    /// * [`SimulationError::InvalidParameter`] when `n_simulations` is zero
    pub fn run<R: Rng + ?Sized>(
        &self,
        n_simulations: usize,
        rng: &mut R,
    ) -> Result<Array1<f64>, SimulationError> {
        if n_simulations == 0 {
            return Err(SimulationError::InvalidParameter(
                "n_simulations must be at least 1".to_string(),
            ));
        }

        let samples: Array2<f64> = self.distribution.sample_batch(n_simulations, rng);
        Ok(samples.dot(&self.weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn identity_model(n: usize) -> MomentModel {
        MomentModel::new(Array1::zeros(n), Array2::eye(n))
    }

    #[test]
    fn test_output_length() {
        let model = identity_model(3);
        let engine = SimulationEngine::new(&model, array![0.4, 0.4, 0.2]).unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let series = engine.run(500, &mut rng).unwrap();
        assert_eq!(series.len(), 500);
    }

    #[test]
    fn test_weight_length_mismatch() {
        let model = identity_model(3);
        let err = SimulationEngine::new(&model, array![0.5, 0.5]).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_zero_simulations_rejected() {
        let model = identity_model(2);
        let engine = SimulationEngine::new(&model, array![0.5, 0.5]).unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            engine.run(0, &mut rng),
            Err(SimulationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_degenerate_weights_select_single_asset() {
        // With weights [1, 0, 0] the portfolio series must equal asset 0's
        // sampled series exactly, draw for draw.
        let model = identity_model(3);
        let engine = SimulationEngine::new(&model, array![1.0, 0.0, 0.0]).unwrap();
        let dist =
            MvnDistribution::new(model.mean().clone(), model.covariance().clone()).unwrap();

        let mut rng_engine = SmallRng::seed_from_u64(99);
        let mut rng_direct = SmallRng::seed_from_u64(99);

        let portfolio = engine.run(200, &mut rng_engine).unwrap();
        let samples = dist.sample_batch(200, &mut rng_direct);

        for t in 0..200 {
            assert_abs_diff_eq!(portfolio[t], samples[[t, 0]], epsilon = 1e-15);
        }
    }

    #[test]
    fn test_non_psd_covariance_rejected() {
        let model = MomentModel::new(Array1::zeros(2), array![[1.0, 2.0], [2.0, 1.0]]);
        assert!(matches!(
            SimulationEngine::new(&model, array![0.5, 0.5]),
            Err(SimulationError::Distribution(
                MvnError::NotPositiveSemiDefinite
            ))
        ));
    }
}
