//! Adaptive random-walk Metropolis sampler over logit(θ).
//!
//! Each chain starts from a dispersed point around the prior mean, tunes
//! its proposal scale during warm-up toward a 1-D acceptance target, and
//! then records `draws` values of θ. Chains are checked with split R-hat.

use std::time::Instant;

use chainrisk_core::config::SamplerConfig;
use chainrisk_core::constants::{
    DEFAULT_CHAINS, DEFAULT_DRAWS, DEFAULT_MAX_R_HAT, DEFAULT_WARMUP, MIN_CHAINS, MIN_DRAWS,
};
use chainrisk_core::errors::SamplingFailure;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::diagnostics::SampleSummary;
use super::model::{logit, sigmoid, BetaObservationModel, BetaPrior};
use super::PosteriorEstimator;

/// Optimal acceptance rate for a one-dimensional random walk.
const TARGET_ACCEPTANCE: f64 = 0.44;
const ADAPT_WINDOW: usize = 50;
const MIN_STEP: f64 = 1e-3;
const MAX_STEP: f64 = 10.0;
/// Iterations between wall-clock checks when a timeout is configured.
const TIMEOUT_CHECK_EVERY: usize = 256;
const CHAIN_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Sampler settings. Use [`MetropolisConfig::from_config`] to resolve
/// them from a loaded `SamplerConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetropolisConfig {
    pub chains: usize,
    pub draws: usize,
    pub warmup: usize,
    pub seed: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub max_r_hat: f64,
    /// Initial proposal standard deviation on the logit scale.
    pub initial_step: f64,
}

impl Default for MetropolisConfig {
    fn default() -> Self {
        Self {
            chains: DEFAULT_CHAINS,
            draws: DEFAULT_DRAWS,
            warmup: DEFAULT_WARMUP,
            seed: None,
            timeout_ms: None,
            max_r_hat: DEFAULT_MAX_R_HAT,
            initial_step: 1.0,
        }
    }
}

impl MetropolisConfig {
    pub fn from_config(config: &SamplerConfig) -> Self {
        Self {
            chains: config.effective_chains(),
            draws: config.effective_draws(),
            warmup: config.effective_warmup(),
            seed: config.seed,
            timeout_ms: config.timeout_ms,
            max_r_hat: config.effective_max_r_hat(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_draws(mut self, draws: usize) -> Self {
        self.draws = draws;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Default estimator: multi-chain Metropolis with convergence checking.
#[derive(Debug, Clone, Default)]
pub struct MetropolisEstimator {
    prior: BetaPrior,
    config: MetropolisConfig,
}

struct ChainRun {
    thetas: Vec<f64>,
    accepted: usize,
}

impl MetropolisEstimator {
    pub fn new(prior: BetaPrior, config: MetropolisConfig) -> Self {
        Self { prior, config }
    }

    pub fn prior(&self) -> BetaPrior {
        self.prior
    }

    pub fn config(&self) -> &MetropolisConfig {
        &self.config
    }

    /// Run all chains and summarize the pooled draws.
    ///
    /// Fails when the run is too small for split R-hat to mean anything,
    /// the chains do not converge, the posterior is not finite at the
    /// starting points, or the time budget runs out.
    pub fn sample(&self, severities: &[f64], kappa: f64) -> Result<SampleSummary, SamplingFailure> {
        if self.config.chains < MIN_CHAINS || self.config.draws < MIN_DRAWS {
            return Err(SamplingFailure::Numerical {
                message: format!(
                    "sampler needs at least {MIN_CHAINS} chains and {MIN_DRAWS} draws, got {} and {}",
                    self.config.chains, self.config.draws
                ),
            });
        }
        let model = BetaObservationModel::new(self.prior, kappa, severities)?;
        let started = Instant::now();
        let chains = self.config.chains;

        let mut runs = Vec::with_capacity(chains);
        for chain in 0..chains {
            let mut rng = self.chain_rng(chain);
            runs.push(self.run_chain(&model, &mut rng, started)?);
        }

        let accepted: usize = runs.iter().map(|r| r.accepted).sum();
        let proposals = (chains * self.config.draws).max(1);
        let thetas: Vec<Vec<f64>> = runs.into_iter().map(|r| r.thetas).collect();
        let summary = SampleSummary::from_chains(&thetas, accepted as f64 / proposals as f64);

        if !summary.mean.is_finite() {
            return Err(SamplingFailure::Numerical {
                message: "posterior mean is not finite".to_string(),
            });
        }
        if !(summary.r_hat <= self.config.max_r_hat) {
            return Err(SamplingFailure::NonConvergence { r_hat: summary.r_hat });
        }

        tracing::debug!(
            observations = model.observations(),
            split_r_hat = summary.r_hat,
            acceptance_rate = summary.acceptance_rate,
            estimate_time_ms = started.elapsed().as_millis() as u64,
            "sampled posterior"
        );
        Ok(summary)
    }

    fn chain_rng(&self, chain: usize) -> StdRng {
        match self.config.seed {
            Some(seed) => {
                StdRng::seed_from_u64(seed ^ (chain as u64 + 1).wrapping_mul(CHAIN_SEED_STRIDE))
            }
            None => StdRng::from_entropy(),
        }
    }

    fn run_chain(
        &self,
        model: &BetaObservationModel,
        rng: &mut StdRng,
        started: Instant,
    ) -> Result<ChainRun, SamplingFailure> {
        let jitter: f64 = rng.sample(StandardNormal);
        let mut current = logit(self.prior.mean()) + jitter;
        let mut current_lp = model.log_density_logit(current);
        if !current_lp.is_finite() {
            return Err(SamplingFailure::Numerical {
                message: format!("log posterior is not finite at start point {current:.4}"),
            });
        }

        let mut step = self.config.initial_step;
        let total = self.config.warmup + self.config.draws;
        let mut thetas = Vec::with_capacity(self.config.draws);
        let mut window_accepted = 0usize;
        let mut accepted = 0usize;

        for i in 0..total {
            if let Some(limit) = self.config.timeout_ms {
                if i % TIMEOUT_CHECK_EVERY == 0 {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    if elapsed_ms > limit {
                        return Err(SamplingFailure::Timeout { elapsed_ms });
                    }
                }
            }

            let noise: f64 = rng.sample(StandardNormal);
            let proposal = current + step * noise;
            let proposal_lp = model.log_density_logit(proposal);
            let log_alpha = proposal_lp - current_lp;

            let u: f64 = rng.gen();
            let accept = log_alpha >= 0.0 || u.ln() < log_alpha;
            if accept {
                current = proposal;
                current_lp = proposal_lp;
            }

            if i < self.config.warmup {
                if accept {
                    window_accepted += 1;
                }
                if (i + 1) % ADAPT_WINDOW == 0 {
                    let rate = window_accepted as f64 / ADAPT_WINDOW as f64;
                    let scale = if rate > TARGET_ACCEPTANCE { 1.1 } else { 0.9 };
                    step = (step * scale).clamp(MIN_STEP, MAX_STEP);
                    window_accepted = 0;
                }
            } else {
                if accept {
                    accepted += 1;
                }
                thetas.push(sigmoid(current));
            }
        }

        Ok(ChainRun { thetas, accepted })
    }
}

impl PosteriorEstimator for MetropolisEstimator {
    fn estimate(&self, severities: &[f64], kappa: f64) -> Result<f64, SamplingFailure> {
        self.sample(severities, kappa).map(|s| s.mean)
    }
}
