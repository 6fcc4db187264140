//! Aggregation configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_KAPPA, DEFAULT_NO_DATA_SCORE, DEFAULT_PRIOR_ALPHA, DEFAULT_PRIOR_BETA,
};

/// What the pipeline does when a category's estimator fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingFailurePolicy {
    /// Fail the whole run; nothing is persisted.
    #[default]
    Abort,
    /// Substitute `default_no_data_score` for the failed category and log it.
    UseDefault,
}

impl SamplingFailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" => Some(Self::Abort),
            "use_default" | "default" => Some(Self::UseDefault),
            _ => None,
        }
    }
}

/// Configuration for the aggregation subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AggregationConfig {
    /// Concentration of observed severities around the category risk. Default: 5.0.
    pub kappa: Option<f64>,
    /// Score assigned to categories without observations. Default: 0.1.
    pub default_no_data_score: Option<f64>,
    /// Prior Beta alpha. Default: 1.0.
    pub prior_alpha: Option<f64>,
    /// Prior Beta beta. Default: 4.0.
    pub prior_beta: Option<f64>,
    /// Estimator failure policy. Default: abort.
    pub on_sampling_failure: Option<SamplingFailurePolicy>,
    /// Estimate categories on the rayon pool. Default: true.
    pub parallel: Option<bool>,
}

impl AggregationConfig {
    pub fn effective_kappa(&self) -> f64 {
        self.kappa.unwrap_or(DEFAULT_KAPPA)
    }

    pub fn effective_default_no_data_score(&self) -> f64 {
        self.default_no_data_score.unwrap_or(DEFAULT_NO_DATA_SCORE)
    }

    pub fn effective_prior_alpha(&self) -> f64 {
        self.prior_alpha.unwrap_or(DEFAULT_PRIOR_ALPHA)
    }

    pub fn effective_prior_beta(&self) -> f64 {
        self.prior_beta.unwrap_or(DEFAULT_PRIOR_BETA)
    }

    pub fn effective_failure_policy(&self) -> SamplingFailurePolicy {
        self.on_sampling_failure.unwrap_or_default()
    }

    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
