//! Five-point likelihood and impact scales of the risk matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{SCALE_TOLERANCE, SCALE_VALUES};
use crate::errors::{ScaleAxis, ScaleError};

/// Position of `value` on the five-point scale, if it is one of the points.
fn scale_position(value: f64) -> Option<usize> {
    if !value.is_finite() {
        return None;
    }
    SCALE_VALUES
        .iter()
        .position(|point| (point - value).abs() <= SCALE_TOLERANCE)
}

/// Probability that a risk event disrupts the supply chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Likelihood {
    Rare,
    Unlikely,
    Possible,
    Likely,
    AlmostCertain,
}

impl Likelihood {
    pub const ALL: [Likelihood; 5] = [
        Self::Rare,
        Self::Unlikely,
        Self::Possible,
        Self::Likely,
        Self::AlmostCertain,
    ];

    pub fn value(&self) -> f64 {
        SCALE_VALUES[*self as usize]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rare => "Rare",
            Self::Unlikely => "Unlikely",
            Self::Possible => "Possible",
            Self::Likely => "Likely",
            Self::AlmostCertain => "Almost Certain",
        }
    }

    pub fn from_value(value: f64) -> Result<Self, ScaleError> {
        scale_position(value)
            .map(|i| Self::ALL[i])
            .ok_or(ScaleError::InvalidScaleValue {
                axis: ScaleAxis::Likelihood,
                value,
            })
    }

    pub fn from_label(label: &str) -> Result<Self, ScaleError> {
        Self::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| ScaleError::UnknownLabel {
                axis: ScaleAxis::Likelihood,
                label: label.to_string(),
            })
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.value())
    }
}

/// Severity of the disruption if a risk event materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Impact {
    Insignificant,
    Minor,
    Moderate,
    Major,
    Catastrophic,
}

impl Impact {
    pub const ALL: [Impact; 5] = [
        Self::Insignificant,
        Self::Minor,
        Self::Moderate,
        Self::Major,
        Self::Catastrophic,
    ];

    pub fn value(&self) -> f64 {
        SCALE_VALUES[*self as usize]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Insignificant => "Insignificant",
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Major => "Major",
            Self::Catastrophic => "Catastrophic",
        }
    }

    pub fn from_value(value: f64) -> Result<Self, ScaleError> {
        scale_position(value)
            .map(|i| Self::ALL[i])
            .ok_or(ScaleError::InvalidScaleValue {
                axis: ScaleAxis::Impact,
                value,
            })
    }

    pub fn from_label(label: &str) -> Result<Self, ScaleError> {
        Self::ALL
            .into_iter()
            .find(|i| i.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| ScaleError::UnknownLabel {
                axis: ScaleAxis::Impact,
                label: label.to_string(),
            })
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.value())
    }
}
