//! Typed query functions over a borrowed connection.

pub mod events;
pub mod risk_scores;

use chainrisk_core::errors::StorageError;

pub(crate) fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError { message: e.to_string() }
}
