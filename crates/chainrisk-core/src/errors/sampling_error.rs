//! Posterior sampling errors.

use super::error_code::{self, ChainRiskErrorCode};
use crate::types::CanonicalCategory;

/// Why an estimator could not produce a value.
///
/// Returned by estimators, which know nothing about categories. The
/// pipeline attaches category context by wrapping it in [`SamplingError`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingFailure {
    #[error("chains did not converge (split r_hat = {r_hat:.4})")]
    NonConvergence { r_hat: f64 },

    #[error("numerical failure: {message}")]
    Numerical { message: String },

    #[error("sampling exceeded its time budget after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("observation {index} is not a severity in [0, 1]: {value}")]
    InvalidObservation { index: usize, value: f64 },
}

/// A per-category estimation failure with enough context for the caller to
/// choose between retry, default substitution, or abort.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("sampling failed for {category} ({observations} observations): {failure}")]
pub struct SamplingError {
    pub category: CanonicalCategory,
    pub observations: usize,
    #[source]
    pub failure: SamplingFailure,
}

impl SamplingError {
    pub fn new(category: CanonicalCategory, observations: usize, failure: SamplingFailure) -> Self {
        Self {
            category,
            observations,
            failure,
        }
    }
}

impl ChainRiskErrorCode for SamplingError {
    fn error_code(&self) -> &'static str {
        error_code::SAMPLING_ERROR
    }
}
