//! Risk metrics over a simulated return distribution.

use crate::stats;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during metric computation.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The input series has no elements
    #[error("Cannot compute metrics over an empty series")]
    EmptySeries,
}

/// Scalar risk statistics reduced from a daily return distribution.
///
/// All percentile-based fields share the linear-interpolation convention in
/// [`stats::percentile`]. `worst_case` is the 1st percentile — the same
/// definition as `var_99`, while `best_case` uses the 95th; both fields are
/// kept as-is for report compatibility (the true extremes are `max_gain` and
/// `max_loss`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Mean daily return.
    pub mean: f64,
    /// Median daily return.
    pub median: f64,
    /// Population standard deviation of daily returns.
    pub std_dev: f64,
    /// 95% Value at Risk: the 5th percentile.
    pub var_95: f64,
    /// 99% Value at Risk: the 1st percentile.
    pub var_99: f64,
    /// 95% Conditional VaR: mean of all returns at or below `var_95`.
    pub cvar_95: f64,
    /// Fraction of trials with a strictly negative return.
    pub prob_loss: f64,
    /// Fraction of trials with a strictly positive return.
    pub prob_gain: f64,
    /// 95th percentile return.
    pub best_case: f64,
    /// 1st percentile return (same definition as `var_99`).
    pub worst_case: f64,
    /// Largest simulated return.
    pub max_gain: f64,
    /// Smallest simulated return.
    pub max_loss: f64,
}

impl RiskMetrics {
    /// Reduce a return series into risk statistics.
    ///
    /// A single-element series is degenerate (zero std, every percentile
    /// equal to the value) but valid; only an empty series fails.
    ///
    /// # Errors
    /// * [`MetricsError::EmptySeries`] when the series has no elements
    pub fn from_returns(returns: ArrayView1<'_, f64>) -> Result<Self, MetricsError> {
        if returns.is_empty() {
            return Err(MetricsError::EmptySeries);
        }

        let n = returns.len() as f64;
        let mut sorted: Vec<f64> = returns.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = stats::mean(&sorted);
        let var_95 = stats::percentile(&sorted, 5.0);
        let var_99 = stats::percentile(&sorted, 1.0);

        // Tail average over every return at or below the VaR threshold.
        // The sorted minimum is always <= var_95, so the tail is non-empty.
        let tail: Vec<f64> = sorted
            .iter()
            .copied()
            .take_while(|r| *r <= var_95)
            .collect();
        let cvar_95 = stats::mean(&tail);

        Ok(Self {
            mean,
            median: stats::median(&sorted),
            std_dev: stats::population_std(&sorted, mean),
            var_95,
            var_99,
            cvar_95,
            prob_loss: sorted.iter().filter(|r| **r < 0.0).count() as f64 / n,
            prob_gain: sorted.iter().filter(|r| **r > 0.0).count() as f64 / n,
            best_case: stats::percentile(&sorted, 95.0),
            worst_case: var_99,
            max_gain: sorted[sorted.len() - 1],
            max_loss: sorted[0],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;

    fn ramp_series(n: usize) -> Array1<f64> {
        // Symmetric ramp from -0.05 to +0.05.
        Array1::from_iter((0..n).map(|i| -0.05 + 0.1 * i as f64 / (n - 1) as f64))
    }

    #[test]
    fn test_empty_series_rejected() {
        let series = Array1::<f64>::zeros(0);
        assert!(matches!(
            RiskMetrics::from_returns(series.view()),
            Err(MetricsError::EmptySeries)
        ));
    }

    #[test]
    fn test_single_element_degenerate() {
        let series = Array1::from_vec(vec![0.02]);
        let m = RiskMetrics::from_returns(series.view()).unwrap();

        assert_abs_diff_eq!(m.mean, 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(m.median, 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(m.std_dev, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m.var_95, 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(m.cvar_95, 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(m.max_gain, 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(m.max_loss, 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(m.prob_gain, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(m.prob_loss, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_var_ordering_invariants() {
        let m = RiskMetrics::from_returns(ramp_series(1001).view()).unwrap();

        // The 5% VaR is never more extreme than the 1% VaR, and the tail
        // average is at least as severe as its threshold.
        assert!(m.var_95 >= m.var_99);
        assert!(m.cvar_95 <= m.var_95);
        assert!(m.max_loss <= m.worst_case);
        assert!(m.worst_case <= m.median);
        assert!(m.median <= m.best_case);
        assert!(m.best_case <= m.max_gain);
    }

    #[test]
    fn test_worst_case_equals_var_99() {
        let m = RiskMetrics::from_returns(ramp_series(500).view()).unwrap();
        assert_abs_diff_eq!(m.worst_case, m.var_99, epsilon = 0.0);
    }

    #[test]
    fn test_symmetric_ramp_statistics() {
        let m = RiskMetrics::from_returns(ramp_series(1001).view()).unwrap();

        assert_abs_diff_eq!(m.mean, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.median, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.var_95, -0.045, epsilon = 1e-12);
        assert_abs_diff_eq!(m.var_99, -0.049, epsilon = 1e-12);
        assert_abs_diff_eq!(m.best_case, 0.045, epsilon = 1e-12);
        assert_abs_diff_eq!(m.max_gain, 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(m.max_loss, -0.05, epsilon = 1e-12);
        // 500 strictly negative, 500 strictly positive, 1 zero.
        assert_abs_diff_eq!(m.prob_loss, 500.0 / 1001.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.prob_gain, 500.0 / 1001.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cvar_is_tail_mean() {
        // Five losses and 95 gains of 0.01. The 5th percentile of 100 points
        // interpolates to 0.0085, so the tail at or below it is exactly the
        // five losses and cvar_95 is their mean, -0.06.
        let mut values = vec![-0.10, -0.08, -0.06, -0.04, -0.02];
        values.extend(std::iter::repeat_n(0.01, 95));
        let series = Array1::from_vec(values);
        let m = RiskMetrics::from_returns(series.view()).unwrap();

        assert_abs_diff_eq!(m.var_95, 0.0085, epsilon = 1e-12);
        assert_abs_diff_eq!(m.cvar_95, -0.06, epsilon = 1e-12);
        assert!(m.cvar_95 <= m.var_95);
        assert_abs_diff_eq!(m.max_loss, -0.10, epsilon = 1e-15);
    }
}
