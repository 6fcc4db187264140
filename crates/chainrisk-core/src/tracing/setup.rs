//! Subscriber installation for hosts that don't bring their own.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Env var holding the filter directives.
pub const LOG_ENV_VAR: &str = "CHAINRISK_LOG";

/// Directives used when `CHAINRISK_LOG` is unset, blank, or unparseable.
/// Everything outside the workspace crates logs at warn.
pub const DEFAULT_DIRECTIVES: &str =
    "warn,chainrisk_core=info,chainrisk_analysis=info,chainrisk_storage=info";

/// Build the filter for the given directive string, falling back to
/// [`DEFAULT_DIRECTIVES`].
pub fn filter_from_directives(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a fmt subscriber filtered by `CHAINRISK_LOG`, e.g.
/// `CHAINRISK_LOG=chainrisk_analysis=debug,chainrisk_storage=warn`.
///
/// Only the first call does anything. A subscriber already installed by
/// the host process is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let directives = std::env::var(LOG_ENV_VAR).ok();
        let filter = filter_from_directives(directives.as_deref());

        let installed = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .with(filter)
            .try_init()
            .is_ok();
        if installed {
            ::tracing::debug!(
                directives = directives.as_deref().unwrap_or(DEFAULT_DIRECTIVES),
                "tracing subscriber installed"
            );
        }
    });
}
