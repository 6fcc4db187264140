//! ChainRiskErrorCode trait for boundary conversion.

/// Every error enum implements this to expose a stable, machine-readable
/// code alongside its human-readable message.
pub trait ChainRiskErrorCode {
    /// Returns the error code string (e.g., "SAMPLING_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const INVALID_SCALE_VALUE: &str = "INVALID_SCALE_VALUE";
pub const SAMPLING_ERROR: &str = "SAMPLING_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CANCELLED: &str = "CANCELLED";
