//! Classified, assessed risk events as handed over by the classification
//! and relevance-assessment collaborators.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A classifier label: a risk class and the families it was tagged with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCategoryLabel {
    /// Main class, e.g. "Geopolitical". Matched case-insensitively.
    pub class_name: String,
    /// Subcategories, e.g. ["Corruption & Crime"]. May be empty.
    #[serde(default)]
    pub families: SmallVec<[String; 2]>,
}

impl RiskCategoryLabel {
    pub fn new<I, S>(class_name: impl Into<String>, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            class_name: class_name.into(),
            families: families.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-insensitive class comparison.
    pub fn is_class(&self, class_name: &str) -> bool {
        self.class_name.to_lowercase() == class_name.to_lowercase()
    }
}

/// Relevance, likelihood, and impact judgement for one event.
///
/// `likelihood`, `impact`, and `severity` are present iff `is_relevant`.
/// Build relevant assessments with `chainrisk_analysis::severity::assess_relevant`
/// so the severity always comes from the shared normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAssessment {
    pub is_relevant: bool,
    #[serde(default)]
    pub likelihood: Option<f64>,
    #[serde(default)]
    pub impact: Option<f64>,
    #[serde(default)]
    pub severity: Option<f64>,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl EventAssessment {
    pub fn not_relevant(rationale: impl Into<String>) -> Self {
        Self {
            is_relevant: false,
            likelihood: None,
            impact: None,
            severity: None,
            rationale: Some(rationale.into()),
        }
    }

    /// The severity, if this assessment is relevant and fully scored.
    /// Any absent field yields `None`.
    pub fn scored_severity(&self) -> Option<f64> {
        if !self.is_relevant || self.likelihood.is_none() || self.impact.is_none() {
            return None;
        }
        self.severity
    }
}

/// An event together with its classifier labels and assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    pub id: String,
    #[serde(default)]
    pub supply_chain_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub categories: Vec<RiskCategoryLabel>,
    #[serde(default)]
    pub assessment: Option<EventAssessment>,
}

impl ClassifiedEvent {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            supply_chain_id: None,
            title: title.into(),
            categories: Vec::new(),
            assessment: None,
        }
    }

    pub fn with_supply_chain(mut self, supply_chain_id: impl Into<String>) -> Self {
        self.supply_chain_id = Some(supply_chain_id.into());
        self
    }

    pub fn with_label(mut self, label: RiskCategoryLabel) -> Self {
        self.categories.push(label);
        self
    }

    pub fn with_assessment(mut self, assessment: EventAssessment) -> Self {
        self.assessment = Some(assessment);
        self
    }

    /// The severity the router may use: present only for relevant, scored,
    /// labelled events.
    pub fn routable_severity(&self) -> Option<f64> {
        if self.categories.is_empty() {
            return None;
        }
        self.assessment.as_ref().and_then(EventAssessment::scored_severity)
    }
}
