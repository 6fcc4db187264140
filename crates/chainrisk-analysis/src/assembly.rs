//! Risk score assembly: per-category estimates into the persisted record.

use std::collections::BTreeMap;

use chainrisk_core::types::{CanonicalCategory, RiskScoreRecord};

/// One score per canonical category, indexed by [`CanonicalCategory::index`].
/// A fixed array, so a category cannot be left out of the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScores([f64; CanonicalCategory::COUNT]);

impl CategoryScores {
    /// Every category set to `score`.
    pub fn filled(score: f64) -> Self {
        Self([score; CanonicalCategory::COUNT])
    }

    pub fn from_fn(mut f: impl FnMut(CanonicalCategory) -> f64) -> Self {
        Self(CanonicalCategory::ALL.map(|cat| f(cat)))
    }

    pub fn get(&self, category: CanonicalCategory) -> f64 {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: CanonicalCategory, score: f64) {
        self.0[category.index()] = score;
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalCategory, f64)> + '_ {
        CanonicalCategory::ALL.iter().map(move |&cat| (cat, self.get(cat)))
    }
}

/// Build the record for `supply_chain_id`. Deterministic: equal inputs
/// serialize to identical bytes.
pub fn assemble(supply_chain_id: &str, scores: &CategoryScores) -> RiskScoreRecord {
    let scores: BTreeMap<CanonicalCategory, f64> = scores.iter().collect();
    RiskScoreRecord {
        supply_chain_id: supply_chain_id.to_string(),
        scores,
    }
}
