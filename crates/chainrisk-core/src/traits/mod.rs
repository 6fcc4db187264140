//! Seams between the aggregation core and its collaborators.

pub mod cancellation;
pub mod risk_store;

pub use cancellation::{Cancellable, CancellationToken};
pub use risk_store::{InMemoryRiskStore, RiskScoreStore};
