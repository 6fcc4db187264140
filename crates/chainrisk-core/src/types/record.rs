//! The persisted per-supply-chain risk score record.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::CanonicalCategory;

/// Latest posterior risk score per canonical category for one supply chain.
/// Upserted by `supply_chain_id`; no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreRecord {
    pub supply_chain_id: String,
    pub scores: BTreeMap<CanonicalCategory, f64>,
}

impl RiskScoreRecord {
    pub fn score(&self, category: CanonicalCategory) -> Option<f64> {
        self.scores.get(&category).copied()
    }

    pub fn level(&self, category: CanonicalCategory) -> Option<RiskLevel> {
        self.score(category).map(RiskLevel::from_score)
    }

    /// True when every canonical category has a score.
    pub fn is_complete(&self) -> bool {
        CanonicalCategory::ALL
            .iter()
            .all(|cat| self.scores.contains_key(cat))
    }
}

/// Dashboard banding of a [0, 1] risk value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// score < 0.10
    VeryLow,
    /// score < 0.30
    Low,
    /// score < 0.55
    Medium,
    /// score < 0.75
    High,
    /// score >= 0.75
    Extreme,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.10 {
            Self::VeryLow
        } else if score < 0.30 {
            Self::Low
        } else if score < 0.55 {
            Self::Medium
        } else if score < 0.75 {
            Self::High
        } else {
            Self::Extreme
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low Risk",
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
            Self::Extreme => "Extreme Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
