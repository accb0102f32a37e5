#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod annual;
pub mod metrics;
pub mod paths;
pub mod stats;

// Re-export main types
pub use annual::{AnnualizedMetrics, TRADING_DAYS_PER_YEAR};
pub use metrics::{MetricsError, RiskMetrics};
pub use paths::PathSummary;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
