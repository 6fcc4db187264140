//! Aggregation pipeline errors.

use super::error_code::{self, ChainRiskErrorCode};
use super::{ConfigError, SamplingError, StorageError};

/// Errors that abort an aggregation run. When one of these is returned no
/// risk score record has been persisted.
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Aggregation cancelled")]
    Cancelled,
}

impl ChainRiskErrorCode for AggregationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Sampling(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
