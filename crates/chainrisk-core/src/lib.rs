//! # chainrisk-core
//!
//! Shared foundation for the chainrisk aggregation engine: the risk event
//! data model, the persistence and cancellation traits, per-subsystem error
//! enums, layered TOML configuration, and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;
