//! Annualized figures derived from daily risk metrics.

use crate::metrics::RiskMetrics;
use serde::{Deserialize, Serialize};

/// Trading days per year used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized return, volatility and risk-adjusted return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedMetrics {
    /// Expected annual return: daily mean times trading days.
    pub annual_return: f64,
    /// Annual volatility: daily std times the square root of trading days.
    pub annual_volatility: f64,
    /// Sharpe ratio: annual return over annual volatility, 0 when the
    /// volatility is zero (defined degenerate value, not an error).
    pub sharpe_ratio: f64,
}

impl AnnualizedMetrics {
    /// Annualize daily metrics with the given trading-day count.
    pub fn from_daily(metrics: &RiskMetrics, trading_days_per_year: f64) -> Self {
        let annual_return = metrics.mean * trading_days_per_year;
        let annual_volatility = metrics.std_dev * trading_days_per_year.sqrt();
        let sharpe_ratio = if annual_volatility > 0.0 {
            annual_return / annual_volatility
        } else {
            0.0
        };

        Self {
            annual_return,
            annual_volatility,
            sharpe_ratio,
        }
    }
}
