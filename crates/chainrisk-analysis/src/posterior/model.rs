//! Unnormalized log posterior of the Beta observation model.

use chainrisk_core::constants::{DEFAULT_PRIOR_ALPHA, DEFAULT_PRIOR_BETA, OBSERVATION_EPSILON};
use chainrisk_core::errors::SamplingFailure;
use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;

/// Beta prior over the category risk θ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPrior {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for BetaPrior {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_PRIOR_ALPHA,
            beta: DEFAULT_PRIOR_BETA,
        }
    }
}

impl BetaPrior {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    fn is_valid(&self) -> bool {
        self.alpha.is_finite() && self.beta.is_finite() && self.alpha > 0.0 && self.beta > 0.0
    }
}

/// Posterior of θ given severities, reduced to sufficient statistics.
///
/// Severities are validated to lie in [0, 1] and pulled into
/// `[ε, 1 − ε]` because the Beta density is not finite at the endpoints.
#[derive(Debug, Clone)]
pub struct BetaObservationModel {
    prior: BetaPrior,
    kappa: f64,
    n: f64,
    sum_ln_s: f64,
    sum_ln_one_minus_s: f64,
    ln_gamma_kappa: f64,
}

impl BetaObservationModel {
    pub fn new(prior: BetaPrior, kappa: f64, severities: &[f64]) -> Result<Self, SamplingFailure> {
        if !prior.is_valid() {
            return Err(SamplingFailure::Numerical {
                message: format!("invalid prior Beta({}, {})", prior.alpha, prior.beta),
            });
        }
        if !(kappa.is_finite() && kappa > 0.0) {
            return Err(SamplingFailure::Numerical {
                message: format!("concentration must be finite and positive, got {kappa}"),
            });
        }

        let mut sum_ln_s = 0.0;
        let mut sum_ln_one_minus_s = 0.0;
        for (index, &value) in severities.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(SamplingFailure::InvalidObservation { index, value });
            }
            let s = value.clamp(OBSERVATION_EPSILON, 1.0 - OBSERVATION_EPSILON);
            sum_ln_s += s.ln();
            sum_ln_one_minus_s += (1.0 - s).ln();
        }

        Ok(Self {
            prior,
            kappa,
            n: severities.len() as f64,
            sum_ln_s,
            sum_ln_one_minus_s,
            ln_gamma_kappa: ln_gamma(kappa),
        })
    }

    pub fn observations(&self) -> usize {
        self.n as usize
    }

    /// Log posterior density of θ, up to a constant. `-inf` outside (0, 1).
    pub fn log_density(&self, theta: f64) -> f64 {
        if !(theta > 0.0 && theta < 1.0) {
            return f64::NEG_INFINITY;
        }
        self.log_density_parts(theta, 1.0 - theta, theta.ln(), (1.0 - theta).ln())
    }

    /// Log posterior density of η = logit(θ), including the Jacobian
    /// θ(1 − θ) of the transform. Used by samplers working on ℝ.
    pub fn log_density_logit(&self, eta: f64) -> f64 {
        if !eta.is_finite() {
            return f64::NEG_INFINITY;
        }
        let ln_theta = -softplus(-eta);
        let ln_one_minus = -softplus(eta);
        let theta = ln_theta.exp();
        let one_minus = ln_one_minus.exp();
        self.log_density_parts(theta, one_minus, ln_theta, ln_one_minus) + ln_theta + ln_one_minus
    }

    fn log_density_parts(&self, theta: f64, one_minus: f64, ln_theta: f64, ln_one_minus: f64) -> f64 {
        let a = self.kappa * theta;
        let b = self.kappa * one_minus;
        if a <= 0.0 || b <= 0.0 {
            return f64::NEG_INFINITY;
        }

        let log_prior =
            (self.prior.alpha - 1.0) * ln_theta + (self.prior.beta - 1.0) * ln_one_minus;
        let log_likelihood = if self.n == 0.0 {
            0.0
        } else {
            (a - 1.0) * self.sum_ln_s + (b - 1.0) * self.sum_ln_one_minus_s
                - self.n * (ln_gamma(a) + ln_gamma(b) - self.ln_gamma_kappa)
        };

        let total = log_prior + log_likelihood;
        if total.is_nan() {
            f64::NEG_INFINITY
        } else {
            total
        }
    }
}

/// ln(1 + eˣ) without overflow.
fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

/// Logistic function, the inverse of logit.
pub fn sigmoid(eta: f64) -> f64 {
    if eta >= 0.0 {
        1.0 / (1.0 + (-eta).exp())
    } else {
        let e = eta.exp();
        e / (1.0 + e)
    }
}

pub fn logit(theta: f64) -> f64 {
    (theta / (1.0 - theta)).ln()
}
