//! # chainrisk-analysis
//!
//! The risk aggregation pipeline: severity normalization, routing of
//! classified events onto canonical categories, Bayesian posterior
//! estimation per category, and assembly of the persisted score record.

pub mod assembly;
pub mod pipeline;
pub mod posterior;
pub mod routing;
pub mod severity;

pub use assembly::{assemble, CategoryScores};
pub use pipeline::{AggregationSettings, CategoryOutcome, CategoryReport, RiskAggregator};
pub use posterior::{BetaPrior, GridEstimator, MetropolisConfig, MetropolisEstimator, PosteriorEstimator};
pub use routing::{route_severities, CategorySeverityPool};
pub use severity::{apply_override, assess_relevant, normalize_severity};
