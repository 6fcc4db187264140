//! Configuration system for chainrisk.
//! TOML-based, layered resolution: overrides > env > project file > defaults.

pub mod aggregation_config;
pub mod chainrisk_config;
pub mod sampler_config;
pub mod storage_config;

pub use aggregation_config::{AggregationConfig, SamplingFailurePolicy};
pub use chainrisk_config::{ChainRiskConfig, ConfigOverrides};
pub use sampler_config::SamplerConfig;
pub use storage_config::StorageConfig;
