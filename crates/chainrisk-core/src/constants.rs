//! Model constants shared by every chainrisk subsystem.

/// The five points of the likelihood and impact scales, ascending.
pub const SCALE_VALUES: [f64; 5] = [0.001, 0.01, 0.1, 0.5, 0.9];

/// Tolerance used when matching a supplied value against [`SCALE_VALUES`].
pub const SCALE_TOLERANCE: f64 = 1e-9;

/// Smallest raw risk: both axes at their minimum (0.001 + 0.001).
pub const MIN_RAW_RISK: f64 = 0.002;

/// Largest raw risk: both axes at their maximum (0.9 + 0.9).
pub const MAX_RAW_RISK: f64 = 1.8;

/// Class name whose families are routed onto canonical categories.
pub const GEOPOLITICAL_CLASS: &str = "Geopolitical";

pub const DEFAULT_KAPPA: f64 = 5.0;
pub const DEFAULT_NO_DATA_SCORE: f64 = 0.1;
pub const DEFAULT_PRIOR_ALPHA: f64 = 1.0;
pub const DEFAULT_PRIOR_BETA: f64 = 4.0;

pub const DEFAULT_CHAINS: usize = 2;
pub const DEFAULT_DRAWS: usize = 1000;
pub const DEFAULT_WARMUP: usize = 500;
pub const DEFAULT_MAX_R_HAT: f64 = 1.05;
pub const MIN_CHAINS: usize = 2;
pub const MIN_DRAWS: usize = 100;

/// Severities are pulled this far inside (0, 1) before the Beta likelihood
/// is evaluated; the density has no finite value at the endpoints.
pub const OBSERVATION_EPSILON: f64 = 1e-4;
