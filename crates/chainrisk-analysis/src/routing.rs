//! Category routing: classified events → per-category severity lists.

use chainrisk_core::constants::GEOPOLITICAL_CLASS;
use chainrisk_core::types::{CanonicalCategory, ClassifiedEvent};

/// Severities collected per canonical category for one aggregation run.
/// Every category is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySeverityPool {
    severities: [Vec<f64>; CanonicalCategory::COUNT],
}

impl CategorySeverityPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: CanonicalCategory, severity: f64) {
        self.severities[category.index()].push(severity);
    }

    pub fn get(&self, category: CanonicalCategory) -> &[f64] {
        &self.severities[category.index()]
    }

    /// Categories paired with their severities, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalCategory, &[f64])> + '_ {
        CanonicalCategory::ALL
            .into_iter()
            .map(move |cat| (cat, self.get(cat)))
    }

    pub fn total_observations(&self) -> usize {
        self.severities.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_observations() == 0
    }
}

/// Route each relevant, scored, labelled event's severity onto the
/// categories named by its geopolitical families.
///
/// Family names must equal a category display name (case-insensitive);
/// a family maps to at most one category. Other classes contribute nothing.
pub fn route_severities(events: &[ClassifiedEvent]) -> CategorySeverityPool {
    let mut pool = CategorySeverityPool::new();
    let mut routed = 0usize;
    let mut skipped = 0usize;

    for event in events {
        let Some(severity) = event.routable_severity() else {
            skipped += 1;
            continue;
        };

        let before = pool.total_observations();
        for label in event
            .categories
            .iter()
            .filter(|label| label.is_class(GEOPOLITICAL_CLASS))
        {
            for family in &label.families {
                if let Some(category) = CanonicalCategory::from_display_name(family) {
                    pool.push(category, severity);
                }
            }
        }
        if pool.total_observations() > before {
            routed += 1;
        }
    }

    tracing::debug!(
        routed_events = routed,
        skipped_events = skipped,
        observations = pool.total_observations(),
        "routed event severities"
    );
    pool
}
