//! V002: latest risk score per supply chain and category.

pub const MIGRATION_SQL: &str = r#"
-- Replaced wholesale on every aggregation run; no history is kept.
CREATE TABLE IF NOT EXISTS risk_scores (
    supply_chain_id TEXT NOT NULL,
    category TEXT NOT NULL,
    score REAL NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (supply_chain_id, category)
) STRICT;
"#;
