//! Deterministic posterior mean by midpoint quadrature on (0, 1).

use chainrisk_core::errors::SamplingFailure;

use super::model::{BetaObservationModel, BetaPrior};
use super::PosteriorEstimator;

const DEFAULT_GRID_POINTS: usize = 2000;

/// Reference estimator. Exact to quadrature error, no randomness, no
/// convergence diagnostics. Used in tests and wherever repeatable scores
/// matter more than the sampler's generality.
#[derive(Debug, Clone, Copy)]
pub struct GridEstimator {
    prior: BetaPrior,
    points: usize,
}

impl Default for GridEstimator {
    fn default() -> Self {
        Self::new(BetaPrior::default())
    }
}

impl GridEstimator {
    pub fn new(prior: BetaPrior) -> Self {
        Self {
            prior,
            points: DEFAULT_GRID_POINTS,
        }
    }

    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points.max(2);
        self
    }
}

impl PosteriorEstimator for GridEstimator {
    fn estimate(&self, severities: &[f64], kappa: f64) -> Result<f64, SamplingFailure> {
        let model = BetaObservationModel::new(self.prior, kappa, severities)?;
        let h = 1.0 / self.points as f64;

        let log_densities: Vec<(f64, f64)> = (0..self.points)
            .map(|i| {
                let theta = (i as f64 + 0.5) * h;
                (theta, model.log_density(theta))
            })
            .collect();

        let max = log_densities
            .iter()
            .map(|&(_, lp)| lp)
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(SamplingFailure::Numerical {
                message: "posterior density vanishes on the whole grid".to_string(),
            });
        }

        let (mut weight_sum, mut weighted_theta) = (0.0, 0.0);
        for (theta, lp) in log_densities {
            let w = (lp - max).exp();
            weight_sum += w;
            weighted_theta += w * theta;
        }

        let mean = weighted_theta / weight_sum;
        if mean.is_finite() {
            Ok(mean)
        } else {
            Err(SamplingFailure::Numerical {
                message: "grid posterior mean is not finite".to_string(),
            })
        }
    }
}
