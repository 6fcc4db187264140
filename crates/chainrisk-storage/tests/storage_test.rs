//! SQLite store: migrations, upsert semantics, relevant-only event query.

use std::collections::BTreeMap;

use chainrisk_core::errors::{ChainRiskErrorCode, StorageError};
use chainrisk_core::traits::RiskScoreStore;
use chainrisk_core::types::{
    CanonicalCategory, ClassifiedEvent, EventAssessment, RiskCategoryLabel, RiskScoreRecord,
};
use chainrisk_storage::connection::pragmas::{apply_pragmas, verify_wal_mode};
use chainrisk_storage::migrations;
use chainrisk_storage::{DatabaseManager, SqliteRiskStore};
use rusqlite::Connection;
use tempfile::TempDir;

fn record(id: &str, score: f64) -> RiskScoreRecord {
    RiskScoreRecord {
        supply_chain_id: id.to_string(),
        scores: CanonicalCategory::ALL.iter().map(|&c| (c, score)).collect(),
    }
}

fn relevant(severity: f64) -> EventAssessment {
    EventAssessment {
        is_relevant: true,
        likelihood: Some(0.5),
        impact: Some(0.5),
        severity: Some(severity),
        rationale: None,
    }
}

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .filter_map(|r| r.ok())
        .collect()
}

#[test]
fn test_migrations_create_schema_and_set_version() {
    let conn = Connection::open_in_memory().unwrap();
    apply_pragmas(&conn).unwrap();
    assert_eq!(migrations::current_version(&conn).unwrap(), 0);

    let version = migrations::run_migrations(&conn).unwrap();
    assert_eq!(version, migrations::LATEST_VERSION);
    assert_eq!(table_names(&conn), vec!["events", "risk_scores"]);

    // Second run is a no-op.
    assert_eq!(migrations::run_migrations(&conn).unwrap(), migrations::LATEST_VERSION);
}

#[test]
fn test_reopen_on_disk_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chainrisk.db");

    {
        let store = SqliteRiskStore::open(&path).unwrap();
        store.upsert_risk_score(&record("1", 0.3)).unwrap();
    }
    {
        let db = DatabaseManager::open(&path).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        db.with_conn(|conn| {
            assert_eq!(migrations::current_version(conn).unwrap(), migrations::LATEST_VERSION);
            assert!(verify_wal_mode(conn).unwrap());
            Ok(())
        })
        .unwrap();
    }

    let store = SqliteRiskStore::open(&path).unwrap();
    assert_eq!(store.get_risk_score("1").unwrap(), Some(record("1", 0.3)));
}

#[test]
fn test_upsert_overwrites_previous_scores() {
    let store = SqliteRiskStore::open_in_memory().unwrap();
    store.upsert_risk_score(&record("1", 0.1)).unwrap();
    store.upsert_risk_score(&record("1", 0.65)).unwrap();

    let stored = store.get_risk_score("1").unwrap().unwrap();
    assert_eq!(stored, record("1", 0.65));
    assert_eq!(store.list_risk_scores().unwrap().len(), 1);
}

#[test]
fn test_upsert_drops_categories_missing_from_new_record() {
    let store = SqliteRiskStore::open_in_memory().unwrap();
    store.upsert_risk_score(&record("1", 0.1)).unwrap();

    let partial = RiskScoreRecord {
        supply_chain_id: "1".to_string(),
        scores: BTreeMap::from([(CanonicalCategory::InterstateConflict, 0.4)]),
    };
    store.upsert_risk_score(&partial).unwrap();
    assert_eq!(store.get_risk_score("1").unwrap(), Some(partial));
}

#[test]
fn test_events_query_returns_relevant_assessed_only() {
    let store = SqliteRiskStore::open_in_memory().unwrap();
    let label = RiskCategoryLabel::new("Geopolitical", ["Corruption & Crime"]);
    let events = [
        ClassifiedEvent::new("relevant", "r")
            .with_supply_chain("1")
            .with_label(label.clone())
            .with_assessment(relevant(0.55)),
        ClassifiedEvent::new("irrelevant", "i")
            .with_supply_chain("1")
            .with_label(label.clone())
            .with_assessment(EventAssessment::not_relevant("no exposure")),
        ClassifiedEvent::new("unassessed", "u")
            .with_supply_chain("1")
            .with_label(label.clone()),
        ClassifiedEvent::new("other-chain", "o")
            .with_supply_chain("2")
            .with_label(label.clone())
            .with_assessment(relevant(0.9)),
    ];
    store.save_events(&events).unwrap();

    let fetched = store.get_events_for_supply_chain("1").unwrap();
    assert_eq!(fetched, vec![events[0].clone()]);
    assert_eq!(fetched[0].routable_severity(), Some(0.55));
}

#[test]
fn test_unknown_category_row_is_a_serialization_error() {
    let store = SqliteRiskStore::open_in_memory().unwrap();
    store
        .db()
        .with_conn(|conn| {
            conn.execute(
                "INSERT INTO risk_scores (supply_chain_id, category, score, updated_at)
                 VALUES ('1', 'Cyber', 0.5, 0)",
                [],
            )
            .unwrap();
            Ok(())
        })
        .unwrap();

    let err = store.get_risk_score("1").unwrap_err();
    assert!(matches!(err, StorageError::Serialization { .. }));
    assert_eq!(err.error_code(), "STORAGE_ERROR");
}
