//! Domain types for the risk aggregation pipeline.

pub mod category;
pub mod event;
pub mod record;
pub mod scale;

pub use category::CanonicalCategory;
pub use event::{ClassifiedEvent, EventAssessment, RiskCategoryLabel};
pub use record::{RiskLevel, RiskScoreRecord};
pub use scale::{Impact, Likelihood};
