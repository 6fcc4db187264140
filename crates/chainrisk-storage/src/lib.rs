//! # chainrisk-storage
//!
//! SQLite persistence for classified events and per-supply-chain risk
//! scores. [`SqliteRiskStore`] implements the core `RiskScoreStore` trait.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::DatabaseManager;
pub use store::SqliteRiskStore;
