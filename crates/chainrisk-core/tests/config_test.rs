//! Tests for the chainrisk configuration system.

use std::io;
use std::sync::{Arc, Mutex};

use chainrisk_core::config::{ChainRiskConfig, ConfigOverrides, SamplingFailurePolicy};
use chainrisk_core::errors::ConfigError;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_chainrisk_env_vars() {
    for key in [
        "CHAINRISK_KAPPA",
        "CHAINRISK_DEFAULT_NO_DATA_SCORE",
        "CHAINRISK_PRIOR_ALPHA",
        "CHAINRISK_PRIOR_BETA",
        "CHAINRISK_ON_SAMPLING_FAILURE",
        "CHAINRISK_PARALLEL",
        "CHAINRISK_SAMPLER_CHAINS",
        "CHAINRISK_SAMPLER_DRAWS",
        "CHAINRISK_SAMPLER_WARMUP",
        "CHAINRISK_SAMPLER_SEED",
        "CHAINRISK_SAMPLER_TIMEOUT_MS",
        "CHAINRISK_DATABASE_PATH",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_defaults_without_any_layer() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_chainrisk_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    let config = ChainRiskConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.aggregation.effective_kappa(), 5.0);
    assert_eq!(config.aggregation.effective_default_no_data_score(), 0.1);
    assert_eq!(config.aggregation.effective_prior_alpha(), 1.0);
    assert_eq!(config.aggregation.effective_prior_beta(), 4.0);
    assert_eq!(config.aggregation.effective_failure_policy(), SamplingFailurePolicy::Abort);
    assert!(config.aggregation.effective_parallel());
    assert_eq!(config.sampler.effective_chains(), 2);
    assert_eq!(config.sampler.effective_draws(), 1000);
    assert_eq!(config.sampler.effective_warmup(), 500);
    assert!(config.sampler.seed.is_none());
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_chainrisk_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("chainrisk.toml"),
        r#"
[aggregation]
kappa = 8.0
default_no_data_score = 0.15
on_sampling_failure = "use_default"

[sampler]
draws = 400
"#,
    )
    .unwrap();

    // env beats project file
    std::env::set_var("CHAINRISK_SAMPLER_DRAWS", "600");
    // overrides beat env
    std::env::set_var("CHAINRISK_KAPPA", "9.0");
    let overrides = ConfigOverrides {
        kappa: Some(3.0),
        ..Default::default()
    };

    let config = ChainRiskConfig::load(dir.path(), Some(&overrides)).unwrap();
    clear_chainrisk_env_vars();

    assert_eq!(config.aggregation.effective_kappa(), 3.0);
    assert_eq!(config.aggregation.effective_default_no_data_score(), 0.15);
    assert_eq!(
        config.aggregation.effective_failure_policy(),
        SamplingFailurePolicy::UseDefault
    );
    assert_eq!(config.sampler.effective_draws(), 600);
}

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_invalid_env_value_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_chainrisk_env_vars();

    std::env::set_var("CHAINRISK_KAPPA", "not-a-number");
    let dir = tempfile::TempDir::new().unwrap();
    let config = ChainRiskConfig::load(dir.path(), None).unwrap();
    clear_chainrisk_env_vars();

    assert_eq!(config.aggregation.effective_kappa(), 5.0);
}

#[test]
fn test_invalid_env_values_are_logged() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_chainrisk_env_vars();

    std::env::set_var("CHAINRISK_SAMPLER_DRAWS", "lots");
    std::env::set_var("CHAINRISK_ON_SAMPLING_FAILURE", "retry");
    let dir = tempfile::TempDir::new().unwrap();
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .finish();
    let config = tracing::subscriber::with_default(subscriber, || {
        ChainRiskConfig::load(dir.path(), None)
    })
    .unwrap();
    clear_chainrisk_env_vars();

    assert_eq!(config.sampler.effective_draws(), 1000);
    assert_eq!(
        config.aggregation.effective_failure_policy(),
        SamplingFailurePolicy::Abort
    );
    let output = logs.contents();
    assert!(output.contains("ignoring unparseable environment override"), "{output}");
    assert!(output.contains("CHAINRISK_SAMPLER_DRAWS"), "{output}");
    assert!(output.contains("CHAINRISK_ON_SAMPLING_FAILURE"), "{output}");
}

#[test]
fn test_malformed_project_file_is_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_chainrisk_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("chainrisk.toml"), "[aggregation\nkappa = ").unwrap();
    let err = ChainRiskConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_validation_rejects_bad_values() {
    let cases = [
        ("[aggregation]\nkappa = 0.0", "aggregation.kappa"),
        ("[aggregation]\nprior_beta = -1.0", "aggregation.prior_beta"),
        ("[aggregation]\ndefault_no_data_score = 1.5", "aggregation.default_no_data_score"),
        ("[sampler]\nchains = 1", "sampler.chains"),
        ("[sampler]\ndraws = 10", "sampler.draws"),
        ("[sampler]\nmax_r_hat = 0.9", "sampler.max_r_hat"),
        ("[sampler]\ntimeout_ms = 0", "sampler.timeout_ms"),
    ];
    for (toml_str, expected_field) in cases {
        let config = ChainRiskConfig::from_toml(toml_str).unwrap();
        match ChainRiskConfig::validate(&config) {
            Err(ConfigError::ValidationFailed { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected validation failure for {expected_field}, got {other:?}"),
        }
    }
}

#[test]
fn test_toml_round_trip_preserves_values() {
    let config = ChainRiskConfig::from_toml(
        "[aggregation]\nkappa = 6.5\nparallel = false\n[sampler]\nseed = 42\n",
    )
    .unwrap();
    let rendered = config.to_toml().unwrap();
    let back = ChainRiskConfig::from_toml(&rendered).unwrap();
    assert_eq!(back.aggregation.kappa, Some(6.5));
    assert_eq!(back.aggregation.parallel, Some(false));
    assert_eq!(back.sampler.seed, Some(42));
}
