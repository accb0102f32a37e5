//! End-to-end simulation session.
//!
//! A [`SimulationSession`] owns the estimated moment model and the two
//! samplers built from it, so one fit serves both the single-day risk run
//! and the multi-day path generation.

use hobart_sim::{
    EstimationError, MomentModel, PathGenerator, SimulationEngine, SimulationError,
};
use ndarray::{Array1, Array2};
use rand::Rng;
use thiserror::Error;

/// Errors that can occur while building or running a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Moment estimation failed.
    #[error("Estimation error: {0}")]
    Estimation(#[from] EstimationError),

    /// Simulation failed.
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

/// A fitted model plus the samplers derived from it.
#[derive(Debug)]
pub struct SimulationSession {
    model: MomentModel,
    weights: Array1<f64>,
    engine: SimulationEngine,
    generator: PathGenerator,
}

impl SimulationSession {
    /// Estimate a moment model from a T x N returns matrix and build the
    /// session around it.
    ///
    /// # Errors
    /// Returns [`SessionError::Estimation`] when the history is too short
    /// or empty, [`SessionError::Simulation`] when the weights do not match
    /// the asset count or the covariance is not usable.
    pub fn fit(returns: &Array2<f64>, weights: Array1<f64>) -> Result<Self, SessionError> {
        let model = MomentModel::estimate(returns)?;
        Self::from_model(model, weights)
    }

    /// Build a session from an already-estimated model.
    ///
    /// # Errors
    /// Returns [`SessionError::Simulation`] when the weights do not match
    /// the asset count or the covariance is rejected by the sampler.
    pub fn from_model(model: MomentModel, weights: Array1<f64>) -> Result<Self, SessionError> {
        let engine = SimulationEngine::new(&model, weights.clone())?;
        let generator = PathGenerator::new(&model, weights.clone())?;
        Ok(Self {
            model,
            weights,
            engine,
            generator,
        })
    }

    /// The fitted moment model.
    pub const fn model(&self) -> &MomentModel {
        &self.model
    }

    /// The portfolio weights.
    pub const fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Draw `n_simulations` single-day portfolio returns.
    ///
    /// # Errors
    /// Returns [`SessionError::Simulation`] when `n_simulations` is zero.
    pub fn simulate_returns<R: Rng + ?Sized>(
        &self,
        n_simulations: usize,
        rng: &mut R,
    ) -> Result<Array1<f64>, SessionError> {
        Ok(self.engine.run(n_simulations, rng)?)
    }

    /// Generate compounded wealth paths, day-by-path.
    ///
    /// # Errors
    /// Returns [`SessionError::Simulation`] when `n_paths` or `n_days` is
    /// zero.
    pub fn generate_paths<R: Rng + ?Sized>(
        &self,
        n_paths: usize,
        n_days: usize,
        initial_value: f64,
        rng: &mut R,
    ) -> Result<Array2<f64>, SessionError> {
        Ok(self
            .generator
            .generate(n_paths, n_days, initial_value, rng)?)
    }
}
