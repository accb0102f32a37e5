//! Path-ensemble summary statistics.
//!
//! Reduces a compounded value PathMatrix (n_days x n_paths) to statistics
//! over its final row, the ending value distribution.

use crate::metrics::MetricsError;
use crate::stats;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Ending-value statistics for an ensemble of simulated paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    /// Starting portfolio value each path compounded from.
    pub initial_value: f64,
    /// Mean ending value.
    pub mean_final: f64,
    /// Median ending value.
    pub median_final: f64,
    /// Largest ending value.
    pub best_final: f64,
    /// Smallest ending value.
    pub worst_final: f64,
    /// Fraction of paths ending strictly above the initial value.
    pub prob_profitable: f64,
}

impl PathSummary {
    /// Summarize a path matrix by its final row.
    ///
    /// # Errors
    /// * [`MetricsError::EmptySeries`] when the matrix has no rows or no
    ///   columns
    pub fn from_paths(paths: ArrayView2<'_, f64>, initial_value: f64) -> Result<Self, MetricsError> {
        let (n_days, n_paths) = paths.dim();
        if n_days == 0 || n_paths == 0 {
            return Err(MetricsError::EmptySeries);
        }

        let mut finals: Vec<f64> = paths.row(n_days - 1).iter().copied().collect();
        finals.sort_by(|a, b| a.total_cmp(b));

        let profitable = finals.iter().filter(|v| **v > initial_value).count();

        Ok(Self {
            initial_value,
            mean_final: stats::mean(&finals),
            median_final: stats::median(&finals),
            best_final: finals[finals.len() - 1],
            worst_final: finals[0],
            prob_profitable: profitable as f64 / n_paths as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    #[test]
    fn test_summary_uses_final_row_only() {
        // Two days, three paths: only the last row matters.
        let paths = array![
            [9_000.0, 11_000.0, 10_000.0],
            [8_000.0, 12_000.0, 10_500.0]
        ];
        let s = PathSummary::from_paths(paths.view(), 10_000.0).unwrap();

        assert_abs_diff_eq!(s.mean_final, 10_166.666666666666, epsilon = 1e-6);
        assert_abs_diff_eq!(s.median_final, 10_500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.best_final, 12_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.worst_final, 8_000.0, epsilon = 1e-9);
        // Two of three paths end above the initial value.
        assert_abs_diff_eq!(s.prob_profitable, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ending_at_initial_is_not_profitable() {
        let paths = array![[10_000.0, 10_000.0]];
        let s = PathSummary::from_paths(paths.view(), 10_000.0).unwrap();
        assert_abs_diff_eq!(s.prob_profitable, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let paths = Array2::<f64>::zeros((0, 5));
        assert!(matches!(
            PathSummary::from_paths(paths.view(), 10_000.0),
            Err(MetricsError::EmptySeries)
        ));

        let paths = Array2::<f64>::zeros((5, 0));
        assert!(matches!(
            PathSummary::from_paths(paths.view(), 10_000.0),
            Err(MetricsError::EmptySeries)
        ));
    }
}
