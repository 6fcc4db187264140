//! V001: classified events with their relevance assessment.

pub const MIGRATION_SQL: &str = r#"
-- One row per classified event. Assessment columns are all NULL until the
-- event is assessed; likelihood/impact/severity are set only when relevant.
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    supply_chain_id TEXT,
    title TEXT NOT NULL,
    categories_json TEXT NOT NULL DEFAULT '[]',
    is_relevant INTEGER,
    likelihood REAL,
    impact REAL,
    severity REAL,
    rationale TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_events_supply_chain
    ON events(supply_chain_id);
CREATE INDEX IF NOT EXISTS idx_events_unassessed
    ON events(id) WHERE is_relevant IS NULL;
"#;
