//! The persistence collaborator of the aggregation pipeline.
//!
//! The aggregation core never talks to a database directly. The storage
//! crate implements this trait over SQLite; [`InMemoryRiskStore`] serves
//! tests and single-run usage.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::StorageError;
use crate::types::{ClassifiedEvent, RiskScoreRecord};

pub trait RiskScoreStore: Send + Sync {
    /// Insert or replace the record for `record.supply_chain_id`.
    fn upsert_risk_score(&self, record: &RiskScoreRecord) -> Result<(), StorageError>;

    fn get_risk_score(&self, supply_chain_id: &str) -> Result<Option<RiskScoreRecord>, StorageError>;

    /// Events attached to the supply chain that are assessed and relevant.
    fn get_events_for_supply_chain(
        &self,
        supply_chain_id: &str,
    ) -> Result<Vec<ClassifiedEvent>, StorageError>;
}

#[derive(Debug, Default)]
pub struct InMemoryRiskStore {
    scores: RwLock<HashMap<String, RiskScoreRecord>>,
    events: RwLock<Vec<ClassifiedEvent>>,
}

impl InMemoryRiskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an event by id.
    pub fn save_event(&self, event: ClassifiedEvent) -> Result<(), StorageError> {
        let mut events = self.events.write().map_err(|_| poisoned())?;
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event,
            None => events.push(event),
        }
        Ok(())
    }

    pub fn score_count(&self) -> usize {
        self.scores.read().map(|s| s.len()).unwrap_or(0)
    }
}

fn poisoned() -> StorageError {
    StorageError::SqliteError {
        message: "in-memory store lock poisoned".to_string(),
    }
}

impl RiskScoreStore for InMemoryRiskStore {
    fn upsert_risk_score(&self, record: &RiskScoreRecord) -> Result<(), StorageError> {
        self.scores
            .write()
            .map_err(|_| poisoned())?
            .insert(record.supply_chain_id.clone(), record.clone());
        Ok(())
    }

    fn get_risk_score(&self, supply_chain_id: &str) -> Result<Option<RiskScoreRecord>, StorageError> {
        Ok(self
            .scores
            .read()
            .map_err(|_| poisoned())?
            .get(supply_chain_id)
            .cloned())
    }

    fn get_events_for_supply_chain(
        &self,
        supply_chain_id: &str,
    ) -> Result<Vec<ClassifiedEvent>, StorageError> {
        let events = self.events.read().map_err(|_| poisoned())?;
        Ok(events
            .iter()
            .filter(|e| e.supply_chain_id.as_deref() == Some(supply_chain_id))
            .filter(|e| e.assessment.as_ref().is_some_and(|a| a.is_relevant))
            .cloned()
            .collect())
    }
}
