//! SQLite-backed implementation of [`RiskScoreStore`].

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use chainrisk_core::config::StorageConfig;
use chainrisk_core::errors::StorageError;
use chainrisk_core::traits::RiskScoreStore;
use chainrisk_core::types::{ClassifiedEvent, RiskScoreRecord};

use crate::connection::DatabaseManager;
use crate::queries::{events, risk_scores};

/// Event and risk score persistence over one SQLite database.
pub struct SqliteRiskStore {
    db: DatabaseManager,
}

impl SqliteRiskStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = DatabaseManager::open(path)?;
        tracing::debug!(path = %path.display(), "opened risk store");
        Ok(Self { db })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    /// Open the database named by the resolved storage config.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::open(&config.effective_database_path())
    }

    pub fn db(&self) -> &DatabaseManager {
        &self.db
    }

    /// Insert or replace an event by id.
    pub fn save_event(&self, event: &ClassifiedEvent) -> Result<(), StorageError> {
        self.db.with_conn(|conn| events::upsert_event(conn, event))
    }

    pub fn save_events(&self, batch: &[ClassifiedEvent]) -> Result<(), StorageError> {
        self.db.with_conn(|conn| {
            crate::connection::writer::with_immediate_transaction(conn, |tx| {
                batch.iter().try_for_each(|event| events::upsert_event(tx, event))
            })
        })
    }

    pub fn get_event(&self, id: &str) -> Result<Option<ClassifiedEvent>, StorageError> {
        self.db.with_conn(|conn| events::get_event(conn, id))
    }

    /// Returns true if the event existed.
    pub fn delete_event(&self, id: &str) -> Result<bool, StorageError> {
        self.db.with_conn(|conn| events::delete_event(conn, id))
    }

    /// Events still waiting for a relevance assessment.
    pub fn unassessed_events(&self) -> Result<Vec<ClassifiedEvent>, StorageError> {
        self.db.with_conn(events::query_unassessed)
    }

    /// Drop every assessment so events can be re-assessed. Returns the
    /// number of events reset.
    pub fn reset_assessments(&self) -> Result<usize, StorageError> {
        let reset = self.db.with_conn(events::reset_assessments)?;
        tracing::info!(reset, "reset event assessments");
        Ok(reset)
    }

    pub fn event_count(&self) -> Result<usize, StorageError> {
        self.db.with_conn(events::count_events)
    }

    pub fn list_risk_scores(&self) -> Result<Vec<RiskScoreRecord>, StorageError> {
        self.db.with_conn(risk_scores::list_risk_scores)
    }

    /// Returns true if a record existed.
    pub fn delete_risk_score(&self, supply_chain_id: &str) -> Result<bool, StorageError> {
        self.db
            .with_conn(|conn| risk_scores::delete_risk_score(conn, supply_chain_id))
    }
}

impl RiskScoreStore for SqliteRiskStore {
    fn upsert_risk_score(&self, record: &RiskScoreRecord) -> Result<(), StorageError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        self.db
            .with_conn(|conn| risk_scores::replace_risk_scores(conn, record, now))?;
        tracing::debug!(
            supply_chain_id = %record.supply_chain_id,
            categories = record.scores.len(),
            "stored risk scores"
        );
        Ok(())
    }

    fn get_risk_score(&self, supply_chain_id: &str) -> Result<Option<RiskScoreRecord>, StorageError> {
        self.db
            .with_conn(|conn| risk_scores::get_risk_score(conn, supply_chain_id))
    }

    fn get_events_for_supply_chain(
        &self,
        supply_chain_id: &str,
    ) -> Result<Vec<ClassifiedEvent>, StorageError> {
        self.db
            .with_conn(|conn| events::query_relevant_for_supply_chain(conn, supply_chain_id))
    }
}
