//! Posterior risk estimation per canonical category.
//!
//! Model: θ ~ Beta(α₀, β₀) with a pessimistic default prior Beta(1, 4);
//! each severity sᵢ ~ Beta(κθ, κ(1−θ)). The likelihood is not conjugate,
//! so estimators either sample (`MetropolisEstimator`) or integrate
//! numerically (`GridEstimator`). The reported score is the posterior mean.

pub mod diagnostics;
pub mod grid;
pub mod metropolis;
pub mod model;

pub use diagnostics::SampleSummary;
pub use grid::GridEstimator;
pub use metropolis::{MetropolisConfig, MetropolisEstimator};
pub use model::{BetaObservationModel, BetaPrior};

use chainrisk_core::errors::SamplingFailure;

/// Turns one category's severities into a posterior mean risk in (0, 1).
///
/// Implementations never substitute a fallback value; an empty slice is a
/// caller concern (the pipeline applies its no-data score before calling).
pub trait PosteriorEstimator: Send + Sync {
    fn estimate(&self, severities: &[f64], kappa: f64) -> Result<f64, SamplingFailure>;
}

impl<E: PosteriorEstimator + ?Sized> PosteriorEstimator for Box<E> {
    fn estimate(&self, severities: &[f64], kappa: f64) -> Result<f64, SamplingFailure> {
        (**self).estimate(severities, kappa)
    }
}
