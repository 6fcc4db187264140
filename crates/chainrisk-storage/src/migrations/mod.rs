//! Schema migrations tracked in `PRAGMA user_version`.
//!
//! Each migration runs in its own transaction together with the version
//! bump, so a failed migration leaves the previous version intact.

pub mod v001_events;
pub mod v002_risk_scores;

use chainrisk_core::errors::StorageError;
use rusqlite::Connection;

use crate::connection::writer::with_immediate_transaction;

/// Ordered (version, SQL) pairs. Versions start at 1 and are contiguous.
const MIGRATIONS: &[(u32, &str)] = &[
    (1, v001_events::MIGRATION_SQL),
    (2, v002_risk_scores::MIGRATION_SQL),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Current `user_version` of the database.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}

/// Apply every migration newer than the current version. Idempotent.
pub fn run_migrations(conn: &Connection) -> Result<u32, StorageError> {
    apply_migrations(conn, MIGRATIONS)
}

fn apply_migrations(conn: &Connection, migrations: &[(u32, &str)]) -> Result<u32, StorageError> {
    let start = current_version(conn)?;
    let mut version = start;

    for &(target, sql) in migrations.iter().filter(|(v, _)| *v > start) {
        with_immediate_transaction(conn, |tx| {
            tx.execute_batch(sql).map_err(|e| StorageError::MigrationFailed {
                version: target,
                message: e.to_string(),
            })?;
            tx.pragma_update(None, "user_version", target)
                .map_err(|e| StorageError::MigrationFailed {
                    version: target,
                    message: e.to_string(),
                })
        })?;
        tracing::info!(version = target, "applied schema migration");
        version = target;
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    use chainrisk_core::errors::ChainRiskErrorCode;

    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            > 0
    }

    #[test]
    fn test_failed_migration_keeps_previous_version() {
        let conn = Connection::open_in_memory().unwrap();
        let broken: &[(u32, &str)] = &[
            (1, v001_events::MIGRATION_SQL),
            (2, "CREATE TABLE half_done (id INTEGER); CREATE TABLE oops ("),
        ];

        let err = apply_migrations(&conn, broken).unwrap_err();
        assert!(matches!(err, StorageError::MigrationFailed { version: 2, .. }));
        assert_eq!(err.error_code(), "MIGRATION_FAILED");
        assert_eq!(current_version(&conn).unwrap(), 1);
        assert!(table_exists(&conn, "events"));
        assert!(!table_exists(&conn, "half_done"));

        // The real set resumes from version 1.
        assert_eq!(run_migrations(&conn).unwrap(), LATEST_VERSION);
        assert!(table_exists(&conn, "risk_scores"));
    }

    #[test]
    fn test_latest_version_matches_last_migration() {
        assert_eq!(MIGRATIONS.last().map(|(v, _)| *v), Some(LATEST_VERSION));
    }
}
