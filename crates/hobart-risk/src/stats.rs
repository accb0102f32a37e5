//! Scalar reductions shared by the risk metrics.
//!
//! Percentiles use linear interpolation on rank `p/100 * (n - 1)` over the
//! sorted series (numpy's default). The standard deviation here is the
//! population convention (divisor n); the covariance estimator in the
//! simulation crate deliberately uses the sample convention (n - 1). Both
//! follow the system's observed behavior.

/// Arithmetic mean of a non-empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divisor n) around a precomputed mean.
pub fn population_std(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentile of an ascending-sorted slice, `pct` in [0, 100].
///
/// Linear interpolation between the two nearest ranks; a single-element
/// slice returns that element for every percentile.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Median of an ascending-sorted slice.
pub fn median(sorted: &[f64]) -> f64 {
    percentile(sorted, 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(25.0, 2.0)]
    #[case(50.0, 3.0)]
    #[case(75.0, 4.0)]
    #[case(100.0, 5.0)]
    fn test_percentile_exact_ranks(#[case] pct: f64, #[case] expected: f64) {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_abs_diff_eq!(percentile(&sorted, pct), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(10.0, 1.4)]
    #[case(5.0, 1.2)]
    #[case(95.0, 4.8)]
    fn test_percentile_interpolates(#[case] pct: f64, #[case] expected: f64) {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_abs_diff_eq!(percentile(&sorted, pct), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_single_element() {
        assert_abs_diff_eq!(percentile(&[7.5], 1.0), 7.5, epsilon = 1e-15);
        assert_abs_diff_eq!(percentile(&[7.5], 99.0), 7.5, epsilon = 1e-15);
    }

    #[test]
    fn test_median_even_length() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(median(&sorted), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_population_std() {
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] is 4 (population convention).
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_abs_diff_eq!(m, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(population_std(&values, m), 2.0, epsilon = 1e-12);
    }
}
