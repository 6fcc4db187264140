//! Likelihood/impact scale validation errors.

use std::fmt;

use super::error_code::{self, ChainRiskErrorCode};

/// Which axis of the risk matrix a rejected value was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleAxis {
    Likelihood,
    Impact,
}

impl ScaleAxis {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Likelihood => "likelihood",
            Self::Impact => "impact",
        }
    }
}

impl fmt::Display for ScaleAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised at the boundary before normalization. Values are never clamped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("{axis} value {value} is not on the five-point scale (0.001, 0.01, 0.1, 0.5, 0.9)")]
    InvalidScaleValue { axis: ScaleAxis, value: f64 },

    #[error("unknown {axis} label: {label}")]
    UnknownLabel { axis: ScaleAxis, label: String },
}

impl ChainRiskErrorCode for ScaleError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_SCALE_VALUE
    }
}
