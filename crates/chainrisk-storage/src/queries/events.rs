//! Queries for the events table.

use chainrisk_core::errors::StorageError;
use chainrisk_core::types::{ClassifiedEvent, EventAssessment, RiskCategoryLabel};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::sqlite_err;

const SELECT_COLUMNS: &str = "SELECT id, supply_chain_id, title, categories_json, is_relevant,
        likelihood, impact, severity, rationale FROM events";

/// Column values as stored, before the label JSON is decoded.
struct EventRow {
    id: String,
    supply_chain_id: Option<String>,
    title: String,
    categories_json: String,
    is_relevant: Option<bool>,
    likelihood: Option<f64>,
    impact: Option<f64>,
    severity: Option<f64>,
    rationale: Option<String>,
}

impl EventRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            supply_chain_id: row.get(1)?,
            title: row.get(2)?,
            categories_json: row.get(3)?,
            is_relevant: row.get(4)?,
            likelihood: row.get(5)?,
            impact: row.get(6)?,
            severity: row.get(7)?,
            rationale: row.get(8)?,
        })
    }

    fn into_event(self) -> Result<ClassifiedEvent, StorageError> {
        let categories: Vec<RiskCategoryLabel> = serde_json::from_str(&self.categories_json)
            .map_err(|e| StorageError::Serialization {
                what: format!("categories of event {}", self.id),
                message: e.to_string(),
            })?;
        let assessment = self.is_relevant.map(|is_relevant| EventAssessment {
            is_relevant,
            likelihood: self.likelihood,
            impact: self.impact,
            severity: self.severity,
            rationale: self.rationale,
        });
        Ok(ClassifiedEvent {
            id: self.id,
            supply_chain_id: self.supply_chain_id,
            title: self.title,
            categories,
            assessment,
        })
    }
}

/// Insert or replace an event, assessment included.
pub fn upsert_event(conn: &Connection, event: &ClassifiedEvent) -> Result<(), StorageError> {
    let categories_json =
        serde_json::to_string(&event.categories).map_err(|e| StorageError::Serialization {
            what: format!("categories of event {}", event.id),
            message: e.to_string(),
        })?;
    let a = event.assessment.as_ref();

    conn.execute(
        "INSERT INTO events (id, supply_chain_id, title, categories_json, is_relevant,
                             likelihood, impact, severity, rationale)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET
           supply_chain_id = excluded.supply_chain_id,
           title = excluded.title,
           categories_json = excluded.categories_json,
           is_relevant = excluded.is_relevant,
           likelihood = excluded.likelihood,
           impact = excluded.impact,
           severity = excluded.severity,
           rationale = excluded.rationale",
        params![
            event.id,
            event.supply_chain_id,
            event.title,
            categories_json,
            a.map(|a| a.is_relevant),
            a.and_then(|a| a.likelihood),
            a.and_then(|a| a.impact),
            a.and_then(|a| a.severity),
            a.and_then(|a| a.rationale.as_deref()),
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn get_event(conn: &Connection, id: &str) -> Result<Option<ClassifiedEvent>, StorageError> {
    let row = conn
        .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id], EventRow::from_row)
        .optional()
        .map_err(sqlite_err)?;
    row.map(EventRow::into_event).transpose()
}

/// Returns true if a row was deleted.
pub fn delete_event(conn: &Connection, id: &str) -> Result<bool, StorageError> {
    let deleted = conn
        .execute("DELETE FROM events WHERE id = ?1", params![id])
        .map_err(sqlite_err)?;
    Ok(deleted > 0)
}

/// Assessed, relevant events attached to `supply_chain_id`.
pub fn query_relevant_for_supply_chain(
    conn: &Connection,
    supply_chain_id: &str,
) -> Result<Vec<ClassifiedEvent>, StorageError> {
    query_events(
        conn,
        &format!("{SELECT_COLUMNS} WHERE supply_chain_id = ?1 AND is_relevant = 1 ORDER BY id"),
        params![supply_chain_id],
    )
}

/// Events not yet assessed.
pub fn query_unassessed(conn: &Connection) -> Result<Vec<ClassifiedEvent>, StorageError> {
    query_events(
        conn,
        &format!("{SELECT_COLUMNS} WHERE is_relevant IS NULL ORDER BY id"),
        params![],
    )
}

/// Clear every assessment. Returns the number of events reset.
pub fn reset_assessments(conn: &Connection) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE events SET is_relevant = NULL, likelihood = NULL, impact = NULL,
                severity = NULL, rationale = NULL
         WHERE is_relevant IS NOT NULL",
        [],
    )
    .map_err(sqlite_err)
}

pub fn count_events(conn: &Connection) -> Result<usize, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
        .map_err(sqlite_err)
}

fn query_events(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<ClassifiedEvent>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params, EventRow::from_row)
        .map_err(sqlite_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_err)?;
    rows.into_iter().map(EventRow::into_event).collect()
}
