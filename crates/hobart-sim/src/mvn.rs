//! Multivariate normal sampling.
//!
//! Draws correlated return vectors consistent with a mean vector and a
//! positive semi-definite covariance matrix. The covariance is factored
//! once into a lower-triangular matrix L with Σ = L·Lᵀ; each sample is
//! then `x = μ + L·z` for a vector z of independent standard normals.
//!
//! Every sampling call takes an explicit `rand::Rng`, so callers own the
//! random stream and can seed it for deterministic runs.

use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;
use thiserror::Error;

/// Relative tolerance used for the symmetry check and pivot clamping.
const FACTOR_TOLERANCE: f64 = 1e-10;

/// Errors that can occur when constructing the distribution.
#[derive(Debug, Error)]
pub enum MvnError {
    /// Covariance matrix shape does not match the mean vector
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension (length of the mean vector)
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Covariance matrix is not symmetric
    #[error("Covariance matrix is not symmetric")]
    NotSymmetric,

    /// Covariance matrix has a negative eigenvalue direction
    #[error("Covariance matrix is not positive semi-definite")]
    NotPositiveSemiDefinite,
}

/// A multivariate normal distribution over daily asset returns.
#[derive(Debug, Clone)]
pub struct MvnDistribution {
    mean: Array1<f64>,
    /// Lower-triangular factor with `covariance = factor * factor^T`.
    factor: Array2<f64>,
}

impl MvnDistribution {
    /// Construct the distribution, validating the covariance matrix.
    ///
    /// # Errors
    /// * [`MvnError::DimensionMismatch`] if `covariance` is not N x N for an
    ///   N-length `mean`
    /// * [`MvnError::NotSymmetric`] if the matrix is asymmetric beyond
    ///   floating-point tolerance
    /// * [`MvnError::NotPositiveSemiDefinite`] if the factorization finds a
    ///   negative pivot (sampling would be undefined)
    pub fn new(mean: Array1<f64>, covariance: Array2<f64>) -> Result<Self, MvnError> {
        let n = mean.len();
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(MvnError::DimensionMismatch {
                expected: n,
                actual: covariance.nrows().max(covariance.ncols()),
            });
        }

        let scale = matrix_scale(&covariance);
        let tolerance = FACTOR_TOLERANCE * scale;

        for i in 0..n {
            for j in (i + 1)..n {
                if (covariance[[i, j]] - covariance[[j, i]]).abs() > tolerance {
                    return Err(MvnError::NotSymmetric);
                }
            }
        }

        let factor = semidefinite_cholesky(&covariance, tolerance)?;
        Ok(Self { mean, factor })
    }

    /// Dimension N of the distribution.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Draw a single sample `x = μ + L·z`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        let n = self.dim();
        let z = Array1::from_iter((0..n).map(|_| rng.sample::<f64, _>(StandardNormal)));
        &self.mean + &self.factor.dot(&z)
    }

    /// Draw `n_samples` independent samples, one per row.
    pub fn sample_batch<R: Rng + ?Sized>(&self, n_samples: usize, rng: &mut R) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((n_samples, self.dim()));
        for mut row in out.rows_mut() {
            row.assign(&self.sample(rng));
        }
        out
    }
}

/// Magnitude of the largest diagonal entry, floored at 1 so that the
/// tolerance stays meaningful for all-zero matrices.
fn matrix_scale(covariance: &Array2<f64>) -> f64 {
    let max_diag = (0..covariance.nrows())
        .map(|i| covariance[[i, i]].abs())
        .fold(0.0, f64::max);
    max_diag.max(1.0)
}

/// Cholesky factorization extended to positive semi-definite matrices.
///
/// Pivots within `tolerance` of zero are clamped to zero and their columns
/// skipped, so rank-deficient covariances (a constant asset, duplicated
/// series) still factor cleanly. A pivot below `-tolerance` means the matrix
/// has a genuinely negative eigenvalue direction and sampling is undefined.
/// A zero pivot is only valid when the residual off-diagonal entries of its
/// column are also zero; any remaining coupling into a zero-variance
/// direction likewise implies a negative eigenvalue.
fn semidefinite_cholesky(
    covariance: &Array2<f64>,
    tolerance: f64,
) -> Result<Array2<f64>, MvnError> {
    let n = covariance.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let mut pivot = covariance[[j, j]];
        for k in 0..j {
            pivot -= l[[j, k]] * l[[j, k]];
        }

        if pivot < -tolerance {
            return Err(MvnError::NotPositiveSemiDefinite);
        }
        if pivot <= tolerance {
            // Degenerate direction: the column stays zero, but residual
            // coupling into it means the matrix is not PSD.
            for i in (j + 1)..n {
                let mut acc = covariance[[i, j]];
                for k in 0..j {
                    acc -= l[[i, k]] * l[[j, k]];
                }
                if acc.abs() > tolerance {
                    return Err(MvnError::NotPositiveSemiDefinite);
                }
            }
            continue;
        }

        let pivot_sqrt = pivot.sqrt();
        l[[j, j]] = pivot_sqrt;
        for i in (j + 1)..n {
            let mut acc = covariance[[i, j]];
            for k in 0..j {
                acc -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = acc / pivot_sqrt;
        }
    }

    Ok(l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[test]
    fn test_factor_reproduces_covariance() {
        let cov = array![[0.04, 0.01, 0.0], [0.01, 0.09, 0.02], [0.0, 0.02, 0.16]];
        let dist = MvnDistribution::new(Array1::zeros(3), cov.clone()).unwrap();
        let reconstructed = dist.factor.dot(&dist.factor.t());

        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(reconstructed[[i, j]], cov[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_singular_covariance_accepted() {
        // Rank 1: second asset is an exact copy of the first.
        let cov = array![[0.04, 0.04], [0.04, 0.04]];
        let dist = MvnDistribution::new(Array1::zeros(2), cov).unwrap();

        let mut rng = SmallRng::seed_from_u64(7);
        let x = dist.sample(&mut rng);
        assert_abs_diff_eq!(x[0], x[1], epsilon = 1e-12);
    }

    #[rstest]
    #[case::negative_diagonal(array![[1.0, 0.0], [0.0, -1.0]])]
    // Positive diagonal, but eigenvalues 3 and -1.
    #[case::indefinite_off_diagonal(array![[1.0, 2.0], [2.0, 1.0]])]
    // Zero diagonal with residual coupling, eigenvalues +1 and -1: the
    // clamped pivot alone must not let this through.
    #[case::zero_diagonal_coupling(array![[0.0, 1.0], [1.0, 0.0]])]
    fn test_non_psd_rejected(#[case] cov: Array2<f64>) {
        assert!(matches!(
            MvnDistribution::new(Array1::zeros(2), cov),
            Err(MvnError::NotPositiveSemiDefinite)
        ));
    }

    #[test]
    fn test_asymmetric_rejected() {
        let cov = array![[1.0, 0.5], [0.2, 1.0]];
        assert!(matches!(
            MvnDistribution::new(Array1::zeros(2), cov),
            Err(MvnError::NotSymmetric)
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let cov = Array2::<f64>::eye(3);
        assert!(matches!(
            MvnDistribution::new(Array1::zeros(2), cov),
            Err(MvnError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_zero_covariance_is_deterministic() {
        let mean = array![0.05, -0.02];
        let dist = MvnDistribution::new(mean.clone(), Array2::zeros((2, 2))).unwrap();

        let mut rng = SmallRng::seed_from_u64(3);
        let x = dist.sample(&mut rng);
        assert_abs_diff_eq!(x[0], mean[0], epsilon = 1e-15);
        assert_abs_diff_eq!(x[1], mean[1], epsilon = 1e-15);
    }

    #[test]
    fn test_batch_shape_and_determinism() {
        let dist = MvnDistribution::new(Array1::zeros(3), Array2::eye(3)).unwrap();

        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut rng_b = SmallRng::seed_from_u64(42);
        let a = dist.sample_batch(100, &mut rng_a);
        let b = dist.sample_batch(100, &mut rng_b);

        assert_eq!(a.dim(), (100, 3));
        assert_eq!(a, b);
    }
}
