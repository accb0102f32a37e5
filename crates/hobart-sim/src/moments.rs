//! Distribution moments estimated from historical returns.
//!
//! The mean vector and sample covariance matrix fitted here parameterize the
//! multivariate normal return model used by the simulation engine and the
//! path generator. A fitted [`MomentModel`] is immutable: both consumers
//! share it read-only for the lifetime of a simulation session.

use ndarray::{Array1, Array2, Axis};
use thiserror::Error;

/// Errors that can occur during moment estimation.
#[derive(Debug, Error)]
pub enum EstimationError {
    /// Insufficient data for estimation
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// The returns matrix has no asset columns
    #[error("Returns matrix has no asset columns")]
    NoAssets,
}

/// Mean vector and covariance matrix of daily asset returns.
///
/// Estimated once from a T x N returns matrix (T observations, N assets)
/// and never mutated afterward. The covariance uses the sample convention
/// (divisor T - 1), matching pandas' `DataFrame.cov()`.
#[derive(Debug, Clone)]
pub struct MomentModel {
    /// Mean daily return per asset (length N).
    mean: Array1<f64>,
    /// Sample covariance of daily returns (N x N, symmetric).
    covariance: Array2<f64>,
}

impl MomentModel {
    /// Build a model from an explicit mean vector and covariance matrix.
    ///
    /// No validation is performed here; the sampler validates symmetry and
    /// positive semi-definiteness when the distribution is constructed.
    pub const fn new(mean: Array1<f64>, covariance: Array2<f64>) -> Self {
        Self { mean, covariance }
    }

    /// Estimate moments from a T x N matrix of daily fractional returns.
    ///
    /// # Arguments
    /// * `returns` - One row per trading date, one column per asset. Rows
    ///   must be date-aligned across assets with no missing values.
    ///
    /// # Errors
    /// * [`EstimationError::NoAssets`] when N = 0
    /// * [`EstimationError::InsufficientData`] when T < 2 (sample variance
    ///   is undefined)
    pub fn estimate(returns: &Array2<f64>) -> Result<Self, EstimationError> {
        let (n_obs, n_assets) = returns.dim();

        if n_assets == 0 {
            return Err(EstimationError::NoAssets);
        }
        if n_obs < 2 {
            return Err(EstimationError::InsufficientData {
                required: 2,
                actual: n_obs,
            });
        }

        let mut mean = Array1::<f64>::zeros(n_assets);
        for (j, column) in returns.axis_iter(Axis(1)).enumerate() {
            mean[j] = column.sum() / n_obs as f64;
        }

        // Sample covariance with divisor T - 1, symmetric by construction.
        let mut covariance = Array2::<f64>::zeros((n_assets, n_assets));
        let divisor = (n_obs - 1) as f64;
        for i in 0..n_assets {
            for j in i..n_assets {
                let mut acc = 0.0;
                for t in 0..n_obs {
                    acc += (returns[[t, i]] - mean[i]) * (returns[[t, j]] - mean[j]);
                }
                let cov_ij = acc / divisor;
                covariance[[i, j]] = cov_ij;
                covariance[[j, i]] = cov_ij;
            }
        }

        Ok(Self { mean, covariance })
    }

    /// Number of assets N.
    pub fn n_assets(&self) -> usize {
        self.mean.len()
    }

    /// Mean daily return per asset.
    pub const fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Covariance matrix of daily returns.
    pub const fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Daily volatility per asset (square root of the covariance diagonal).
    pub fn volatilities(&self) -> Array1<f64> {
        let n = self.n_assets();
        Array1::from_iter((0..n).map(|i| self.covariance[[i, i]].max(0.0).sqrt()))
    }

    /// Correlation matrix derived from the covariance matrix.
    ///
    /// Entries involving a zero-variance asset are reported as 0.
    pub fn correlation(&self) -> Array2<f64> {
        let n = self.n_assets();
        let vols = self.volatilities();
        let mut corr = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                let denom = vols[i] * vols[j];
                if denom > 0.0 {
                    corr[[i, j]] = self.covariance[[i, j]] / denom;
                }
            }
        }
        corr
    }
}
