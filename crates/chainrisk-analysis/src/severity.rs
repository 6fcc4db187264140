//! Severity normalization: one shared implementation for first assessment
//! and for manual overrides, so the two paths cannot drift apart.

use chainrisk_core::constants::{MAX_RAW_RISK, MIN_RAW_RISK};
use chainrisk_core::errors::ScaleError;
use chainrisk_core::types::{EventAssessment, Impact, Likelihood};

/// Normalize a (likelihood, impact) pair from the five-point scale into a
/// severity in [0, 1].
///
/// `raw = L + I`, `severity = (raw - 0.002) / (1.8 - 0.002)`. Off-scale
/// values fail with `InvalidScaleValue`; nothing is clamped.
pub fn normalize_severity(likelihood: f64, impact: f64) -> Result<f64, ScaleError> {
    let l = Likelihood::from_value(likelihood)?;
    let i = Impact::from_value(impact)?;
    Ok(normalize_levels(l, i))
}

/// Infallible form for already-typed scale levels.
///
/// The canonical scale values are used rather than the caller's floats,
/// so both endpoints are exact (0.0 and 1.0).
pub fn normalize_levels(likelihood: Likelihood, impact: Impact) -> f64 {
    let raw = likelihood.value() + impact.value();
    let severity = (raw - MIN_RAW_RISK) / (MAX_RAW_RISK - MIN_RAW_RISK);
    severity.clamp(0.0, 1.0)
}

/// Build a relevant assessment with its severity attached.
pub fn assess_relevant(
    likelihood: f64,
    impact: f64,
    rationale: Option<String>,
) -> Result<EventAssessment, ScaleError> {
    let severity = normalize_severity(likelihood, impact)?;
    Ok(EventAssessment {
        is_relevant: true,
        likelihood: Some(likelihood),
        impact: Some(impact),
        severity: Some(severity),
        rationale,
    })
}

/// Manual override of likelihood/impact: marks the assessment relevant and
/// recomputes its severity. On error the assessment is left untouched.
pub fn apply_override(
    assessment: &mut EventAssessment,
    likelihood: f64,
    impact: f64,
) -> Result<(), ScaleError> {
    let severity = normalize_severity(likelihood, impact)?;
    assessment.is_relevant = true;
    assessment.likelihood = Some(likelihood);
    assessment.impact = Some(impact);
    assessment.severity = Some(severity);
    Ok(())
}
