//! Multi-day compounded value paths.
//!
//! Each path draws one multivariate normal return vector per day, projects
//! it through the portfolio weights, and compounds the running value:
//! `value[0] = initial * (1 + r_0)`, `value[t] = value[t-1] * (1 + r_t)`.
//!
//! Days are i.i.d. draws: this is a random walk without memory, not a
//! correlated time series. Volatility clustering and autocorrelation are
//! deliberately out of model.

use crate::engine::SimulationError;
use crate::moments::MomentModel;
use crate::mvn::MvnDistribution;
use ndarray::{Array1, Array2};
use rand::Rng;

/// Generator for ensembles of compounded portfolio value trajectories.
///
/// Shares the fitted [`MomentModel`] read-only with the simulation engine;
/// weights follow the same convention (applied as given, no sum-to-1 check).
#[derive(Debug)]
pub struct PathGenerator {
    distribution: MvnDistribution,
    weights: Array1<f64>,
}

impl PathGenerator {
    /// Create a generator for the given fitted model and portfolio weights.
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

    /// Generate an `n_days` x `n_paths` matrix of compounded values.
    ///
    /// Column j is path j's trajectory; the final row is the ending value
    /// distribution. `initial_value` is compounded as given (a zero or
    /// negative start produces degenerate paths, by the caller's choice).
    ///
    /// Paths are statistically independent, so with the `parallel` feature
    /// they are generated across rayon workers, each with its own RNG seeded
    /// from `rng`. A fixed seed yields identical output for a fixed
    /// `n_paths` regardless of thread scheduling.
    ///
    /// # Errors
    /// * [`SimulationError::InvalidParameter`] when `n_paths` or `n_days`
    ///   is zero
    pub fn generate<R: Rng + ?Sized>(
        &self,
        n_paths: usize,
        n_days: usize,
        initial_value: f64,
        rng: &mut R,
    ) -> Result<Array2<f64>, SimulationError> {
        if n_paths == 0 {
            return Err(SimulationError::InvalidParameter(
                "n_paths must be at least 1".to_string(),
            ));
        }
        if n_days == 0 {
            return Err(SimulationError::InvalidParameter(
                "n_days must be at least 1".to_string(),
            ));
        }

        let columns = self.generate_columns(n_paths, n_days, initial_value, rng);

        let mut paths = Array2::<f64>::zeros((n_days, n_paths));
        for (j, column) in columns.iter().enumerate() {
            for (t, value) in column.iter().enumerate() {
                paths[[t, j]] = *value;
            }
        }
        Ok(paths)
    }

    /// Simulate one path's trajectory as a day-ordered vector of values.
    fn simulate_path<R: Rng + ?Sized>(
        &self,
        n_days: usize,
        initial_value: f64,
        rng: &mut R,
    ) -> Vec<f64> {
        let mut value = initial_value;
        let mut trajectory = Vec::with_capacity(n_days);
        for _ in 0..n_days {
            let daily_return = self.distribution.sample(rng).dot(&self.weights);
            value *= 1.0 + daily_return;
            trajectory.push(value);
        }
        trajectory
    }

    #[cfg(feature = "parallel")]
    fn generate_columns<R: Rng + ?Sized>(
        &self,
        n_paths: usize,
        n_days: usize,
        initial_value: f64,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        // Derive one seed per path up front so the output depends only on
        // the caller's RNG state, not on worker scheduling.
        let seeds: Vec<u64> = (0..n_paths).map(|_| rng.next_u64()).collect();

        seeds
            .into_par_iter()
            .map(|seed| {
                let mut path_rng = SmallRng::seed_from_u64(seed);
                self.simulate_path(n_days, initial_value, &mut path_rng)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn generate_columns<R: Rng + ?Sized>(
        &self,
        n_paths: usize,
        n_days: usize,
        initial_value: f64,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        (0..n_paths)
            .map(|_| self.simulate_path(n_days, initial_value, rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn deterministic_model(daily_return: f64) -> MomentModel {
        // Zero covariance: every sampled return equals the mean exactly.
        MomentModel::new(array![daily_return], Array2::zeros((1, 1)))
    }

    #[test]
    fn test_output_shape() {
        let model = MomentModel::new(Array1::zeros(2), Array2::eye(2) * 1e-4);
        let generator = PathGenerator::new(&model, array![0.6, 0.4]).unwrap();

        let mut rng = SmallRng::seed_from_u64(11);
        let paths = generator.generate(7, 30, 10_000.0, &mut rng).unwrap();
        assert_eq!(paths.dim(), (30, 7));
    }

    #[test]
    fn test_single_day_single_path_exact_compounding() {
        // One day at a known 5% return: 10_000 * 1.05 = 10_500 exactly.
        let model = deterministic_model(0.05);
        let generator = PathGenerator::new(&model, array![1.0]).unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        let paths = generator.generate(1, 1, 10_000.0, &mut rng).unwrap();
        assert_eq!(paths.dim(), (1, 1));
        assert_abs_diff_eq!(paths[[0, 0]], 10_500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_compounding_is_cumulative() {
        let model = deterministic_model(0.01);
        let generator = PathGenerator::new(&model, array![1.0]).unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        let paths = generator.generate(2, 3, 1_000.0, &mut rng).unwrap();

        for j in 0..2 {
            assert_abs_diff_eq!(paths[[0, j]], 1_000.0 * 1.01, epsilon = 1e-9);
            assert_abs_diff_eq!(paths[[1, j]], 1_000.0 * 1.01_f64.powi(2), epsilon = 1e-9);
            assert_abs_diff_eq!(paths[[2, j]], 1_000.0 * 1.01_f64.powi(3), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_paths_rejected() {
        let model = deterministic_model(0.0);
        let generator = PathGenerator::new(&model, array![1.0]).unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            generator.generate(0, 10, 1.0, &mut rng),
            Err(SimulationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_days_rejected() {
        let model = deterministic_model(0.0);
        let generator = PathGenerator::new(&model, array![1.0]).unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            generator.generate(10, 0, 1.0, &mut rng),
            Err(SimulationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let model = MomentModel::new(Array1::zeros(2), Array2::eye(2) * 1e-4);
        let generator = PathGenerator::new(&model, array![0.5, 0.5]).unwrap();

        let mut rng_a = SmallRng::seed_from_u64(2024);
        let mut rng_b = SmallRng::seed_from_u64(2024);
        let a = generator.generate(5, 20, 10_000.0, &mut rng_a).unwrap();
        let b = generator.generate(5, 20, 10_000.0, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }
}
