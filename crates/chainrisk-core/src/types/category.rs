//! The closed set of geopolitical risk subcategories scored by the estimator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical geopolitical risk category.
///
/// Declaration order is the canonical iteration order; `Ord` follows it so
/// maps keyed by category serialize deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CanonicalCategory {
    #[serde(rename = "Business Environment (Country Risk)")]
    BusinessEnvironment,
    #[serde(rename = "Corruption & Crime")]
    CorruptionCrime,
    #[serde(rename = "Government Business Policy")]
    GovernmentPolicy,
    #[serde(rename = "Change in Government")]
    ChangeInGovernment,
    #[serde(rename = "Political Violence")]
    PoliticalViolence,
    #[serde(rename = "Interstate Conflict")]
    InterstateConflict,
}

impl CanonicalCategory {
    pub const COUNT: usize = 6;

    pub const ALL: [CanonicalCategory; Self::COUNT] = [
        Self::BusinessEnvironment,
        Self::CorruptionCrime,
        Self::GovernmentPolicy,
        Self::ChangeInGovernment,
        Self::PoliticalViolence,
        Self::InterstateConflict,
    ];

    /// Display name as emitted by the classifier and shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BusinessEnvironment => "Business Environment (Country Risk)",
            Self::CorruptionCrime => "Corruption & Crime",
            Self::GovernmentPolicy => "Government Business Policy",
            Self::ChangeInGovernment => "Change in Government",
            Self::PoliticalViolence => "Political Violence",
            Self::InterstateConflict => "Interstate Conflict",
        }
    }

    /// Position in [`Self::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Exact, case-insensitive match on the full display name.
    /// Partial or synonym matches return `None`.
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cat| cat.display_name().to_lowercase() == name.to_lowercase())
    }
}

impl fmt::Display for CanonicalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
