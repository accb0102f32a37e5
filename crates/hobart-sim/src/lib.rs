#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod moments;
pub mod mvn;
pub mod paths;

// Re-export main types
pub use engine::{SimulationEngine, SimulationError};
pub use moments::{EstimationError, MomentModel};
pub use mvn::{MvnDistribution, MvnError};
pub use paths::PathGenerator;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
