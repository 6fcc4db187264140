//! Queries for the risk_scores table: one row per (supply chain, category).

use std::collections::BTreeMap;

use chainrisk_core::errors::StorageError;
use chainrisk_core::types::{CanonicalCategory, RiskScoreRecord};
use rusqlite::{params, Connection};

use super::sqlite_err;
use crate::connection::writer::with_immediate_transaction;

/// Replace every stored score of `record.supply_chain_id` in one transaction.
pub fn replace_risk_scores(
    conn: &Connection,
    record: &RiskScoreRecord,
    updated_at: i64,
) -> Result<(), StorageError> {
    with_immediate_transaction(conn, |tx| {
        tx.execute(
            "DELETE FROM risk_scores WHERE supply_chain_id = ?1",
            params![record.supply_chain_id],
        )
        .map_err(sqlite_err)?;

        let mut stmt = tx
            .prepare_cached(
                "INSERT INTO risk_scores (supply_chain_id, category, score, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(supply_chain_id, category) DO UPDATE SET
                   score = excluded.score,
                   updated_at = excluded.updated_at",
            )
            .map_err(sqlite_err)?;
        for (category, score) in &record.scores {
            stmt.execute(params![
                record.supply_chain_id,
                category.display_name(),
                score,
                updated_at
            ])
            .map_err(sqlite_err)?;
        }
        Ok(())
    })
}

pub fn get_risk_score(
    conn: &Connection,
    supply_chain_id: &str,
) -> Result<Option<RiskScoreRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT category, score FROM risk_scores WHERE supply_chain_id = ?1")
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![supply_chain_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;

    if rows.is_empty() {
        return Ok(None);
    }
    let mut scores = BTreeMap::new();
    for (category, score) in rows {
        scores.insert(parse_category(&category)?, score);
    }
    Ok(Some(RiskScoreRecord {
        supply_chain_id: supply_chain_id.to_string(),
        scores,
    }))
}

/// Every stored record, ordered by supply chain id.
pub fn list_risk_scores(conn: &Connection) -> Result<Vec<RiskScoreRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT supply_chain_id, category, score FROM risk_scores ORDER BY supply_chain_id",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;

    let mut records: Vec<RiskScoreRecord> = Vec::new();
    for (supply_chain_id, category, score) in rows {
        let category = parse_category(&category)?;
        match records.last_mut() {
            Some(last) if last.supply_chain_id == supply_chain_id => {
                last.scores.insert(category, score);
            }
            _ => records.push(RiskScoreRecord {
                supply_chain_id,
                scores: BTreeMap::from([(category, score)]),
            }),
        }
    }
    Ok(records)
}

/// Returns true if any score was deleted.
pub fn delete_risk_score(conn: &Connection, supply_chain_id: &str) -> Result<bool, StorageError> {
    let deleted = conn
        .execute(
            "DELETE FROM risk_scores WHERE supply_chain_id = ?1",
            params![supply_chain_id],
        )
        .map_err(sqlite_err)?;
    Ok(deleted > 0)
}

fn parse_category(name: &str) -> Result<CanonicalCategory, StorageError> {
    CanonicalCategory::from_display_name(name).ok_or_else(|| StorageError::Serialization {
        what: "risk score category".to_string(),
        message: format!("unknown category {name:?}"),
    })
}
