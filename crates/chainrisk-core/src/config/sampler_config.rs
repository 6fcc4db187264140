//! Posterior sampler configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHAINS, DEFAULT_DRAWS, DEFAULT_MAX_R_HAT, DEFAULT_WARMUP};

/// Configuration for the MCMC posterior sampler.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SamplerConfig {
    /// Independent chains. Default: 2, minimum 2.
    pub chains: Option<usize>,
    /// Retained draws per chain after warm-up. Default: 1000, minimum 100.
    pub draws: Option<usize>,
    /// Tuning iterations discarded per chain. Default: 500.
    pub warmup: Option<usize>,
    /// Base seed; chains derive their own seeds from it. Default: entropy.
    pub seed: Option<u64>,
    /// Wall-clock budget per category estimate in milliseconds. Default: none.
    pub timeout_ms: Option<u64>,
    /// Largest split R-hat accepted as converged. Default: 1.05.
    pub max_r_hat: Option<f64>,
}

impl SamplerConfig {
    pub fn effective_chains(&self) -> usize {
        self.chains.unwrap_or(DEFAULT_CHAINS)
    }

    pub fn effective_draws(&self) -> usize {
        self.draws.unwrap_or(DEFAULT_DRAWS)
    }

    pub fn effective_warmup(&self) -> usize {
        self.warmup.unwrap_or(DEFAULT_WARMUP)
    }

    pub fn effective_max_r_hat(&self) -> f64 {
        self.max_r_hat.unwrap_or(DEFAULT_MAX_R_HAT)
    }
}
