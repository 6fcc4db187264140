//! Top-level chainrisk configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AggregationConfig, SamplerConfig, SamplingFailurePolicy, StorageConfig};
use crate::constants::{MIN_CHAINS, MIN_DRAWS};
use crate::errors::ConfigError;

/// Project config file name looked up in the root passed to [`ChainRiskConfig::load`].
pub const PROJECT_CONFIG_FILE: &str = "chainrisk.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`CHAINRISK_*`)
/// 3. Project config (`chainrisk.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChainRiskConfig {
    pub aggregation: AggregationConfig,
    pub sampler: SamplerConfig,
    pub storage: StorageConfig,
}

/// Caller-supplied overrides, e.g. from a request handler.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub kappa: Option<f64>,
    pub default_no_data_score: Option<f64>,
    pub on_sampling_failure: Option<SamplingFailurePolicy>,
    pub seed: Option<u64>,
    pub database_path: Option<PathBuf>,
}

impl ChainRiskConfig {
    /// Load configuration with layered resolution, then validate it.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ChainRiskConfig) -> Result<(), ConfigError> {
        let agg = &config.aggregation;
        check_positive("aggregation.kappa", agg.kappa)?;
        check_positive("aggregation.prior_alpha", agg.prior_alpha)?;
        check_positive("aggregation.prior_beta", agg.prior_beta)?;
        if let Some(score) = agg.default_no_data_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(invalid(
                    "aggregation.default_no_data_score",
                    "must be between 0.0 and 1.0",
                ));
            }
        }

        let sampler = &config.sampler;
        if let Some(chains) = sampler.chains {
            if chains < MIN_CHAINS {
                return Err(invalid("sampler.chains", &format!("must be at least {MIN_CHAINS}")));
            }
        }
        if let Some(draws) = sampler.draws {
            if draws < MIN_DRAWS {
                return Err(invalid("sampler.draws", &format!("must be at least {MIN_DRAWS}")));
            }
        }
        if let Some(r_hat) = sampler.max_r_hat {
            if !r_hat.is_finite() || r_hat < 1.0 {
                return Err(invalid("sampler.max_r_hat", "must be a finite value >= 1.0"));
            }
        }
        if sampler.timeout_ms == Some(0) {
            return Err(invalid("sampler.timeout_ms", "must be greater than 0"));
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ChainRiskConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ChainRiskConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        ::tracing::debug!(path = %path.display(), "merged project config");
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    fn merge(base: &mut ChainRiskConfig, other: &ChainRiskConfig) {
        let (b, o) = (&mut base.aggregation, &other.aggregation);
        b.kappa = o.kappa.or(b.kappa);
        b.default_no_data_score = o.default_no_data_score.or(b.default_no_data_score);
        b.prior_alpha = o.prior_alpha.or(b.prior_alpha);
        b.prior_beta = o.prior_beta.or(b.prior_beta);
        b.on_sampling_failure = o.on_sampling_failure.or(b.on_sampling_failure);
        b.parallel = o.parallel.or(b.parallel);

        let (b, o) = (&mut base.sampler, &other.sampler);
        b.chains = o.chains.or(b.chains);
        b.draws = o.draws.or(b.draws);
        b.warmup = o.warmup.or(b.warmup);
        b.seed = o.seed.or(b.seed);
        b.timeout_ms = o.timeout_ms.or(b.timeout_ms);
        b.max_r_hat = o.max_r_hat.or(b.max_r_hat);

        if other.storage.database_path.is_some() {
            base.storage.database_path = other.storage.database_path.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CHAINRISK_KAPPA`, `CHAINRISK_SAMPLER_DRAWS`, etc.
    /// Unparseable values are ignored with a warning.
    fn apply_env_overrides(config: &mut ChainRiskConfig) {
        if let Some(v) = env_parse::<f64>("CHAINRISK_KAPPA") {
            config.aggregation.kappa = Some(v);
        }
        if let Some(v) = env_parse::<f64>("CHAINRISK_DEFAULT_NO_DATA_SCORE") {
            config.aggregation.default_no_data_score = Some(v);
        }
        if let Some(v) = env_parse::<f64>("CHAINRISK_PRIOR_ALPHA") {
            config.aggregation.prior_alpha = Some(v);
        }
        if let Some(v) = env_parse::<f64>("CHAINRISK_PRIOR_BETA") {
            config.aggregation.prior_beta = Some(v);
        }
        if let Ok(val) = std::env::var("CHAINRISK_ON_SAMPLING_FAILURE") {
            match SamplingFailurePolicy::parse(&val) {
                Some(policy) => config.aggregation.on_sampling_failure = Some(policy),
                None => warn_unparseable("CHAINRISK_ON_SAMPLING_FAILURE", &val),
            }
        }
        if let Some(v) = env_parse::<bool>("CHAINRISK_PARALLEL") {
            config.aggregation.parallel = Some(v);
        }
        if let Some(v) = env_parse::<usize>("CHAINRISK_SAMPLER_CHAINS") {
            config.sampler.chains = Some(v);
        }
        if let Some(v) = env_parse::<usize>("CHAINRISK_SAMPLER_DRAWS") {
            config.sampler.draws = Some(v);
        }
        if let Some(v) = env_parse::<usize>("CHAINRISK_SAMPLER_WARMUP") {
            config.sampler.warmup = Some(v);
        }
        if let Some(v) = env_parse::<u64>("CHAINRISK_SAMPLER_SEED") {
            config.sampler.seed = Some(v);
        }
        if let Some(v) = env_parse::<u64>("CHAINRISK_SAMPLER_TIMEOUT_MS") {
            config.sampler.timeout_ms = Some(v);
        }
        if let Ok(val) = std::env::var("CHAINRISK_DATABASE_PATH") {
            config.storage.database_path = Some(PathBuf::from(val));
        }
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut ChainRiskConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.kappa {
            config.aggregation.kappa = Some(v);
        }
        if let Some(v) = overrides.default_no_data_score {
            config.aggregation.default_no_data_score = Some(v);
        }
        if let Some(v) = overrides.on_sampling_failure {
            config.aggregation.on_sampling_failure = Some(v);
        }
        if let Some(v) = overrides.seed {
            config.sampler.seed = Some(v);
        }
        if let Some(ref v) = overrides.database_path {
            config.storage.database_path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn_unparseable(key, &raw);
    }
    parsed
}

fn warn_unparseable(key: &str, value: &str) {
    ::tracing::warn!(key, value, "ignoring unparseable environment override");
}

fn check_positive(field: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(invalid(field, "must be a finite value > 0.0")),
        _ => Ok(()),
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
