//! Error handling for chainrisk.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod aggregation_error;
pub mod config_error;
pub mod error_code;
pub mod sampling_error;
pub mod scale_error;
pub mod storage_error;

pub use aggregation_error::AggregationError;
pub use config_error::ConfigError;
pub use error_code::ChainRiskErrorCode;
pub use sampling_error::{SamplingError, SamplingFailure};
pub use scale_error::{ScaleAxis, ScaleError};
pub use storage_error::StorageError;
