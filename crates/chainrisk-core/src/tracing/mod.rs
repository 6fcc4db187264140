//! Observability for chainrisk.
//! `tracing` crate with `EnvFilter`, per-target log levels.

pub mod setup;

pub use setup::{filter_from_directives, init_tracing, DEFAULT_DIRECTIVES, LOG_ENV_VAR};
