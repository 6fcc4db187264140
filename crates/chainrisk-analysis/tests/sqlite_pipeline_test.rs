//! Aggregation against the SQLite store, configured from a project file.

use chainrisk_analysis::{assess_relevant, RiskAggregator};
use chainrisk_core::config::{ChainRiskConfig, ConfigOverrides};
use chainrisk_core::traits::RiskScoreStore;
use chainrisk_core::types::{CanonicalCategory, ClassifiedEvent, RiskCategoryLabel};
use chainrisk_storage::SqliteRiskStore;
use tempfile::TempDir;

fn event(id: &str, families: &[&str], likelihood: f64, impact: f64) -> ClassifiedEvent {
    ClassifiedEvent::new(id, format!("event {id}"))
        .with_supply_chain("1")
        .with_label(RiskCategoryLabel::new("Geopolitical", families.iter().copied()))
        .with_assessment(assess_relevant(likelihood, impact, None).unwrap())
}

#[test]
fn test_aggregate_from_sqlite_and_persist() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("chainrisk.toml"),
        "[aggregation]\nkappa = 5.0\n\n[sampler]\ndraws = 800\n",
    )
    .unwrap();
    let overrides = ConfigOverrides {
        seed: Some(17),
        database_path: Some(dir.path().join("risk.db")),
        ..Default::default()
    };
    let config = ChainRiskConfig::load(dir.path(), Some(&overrides)).unwrap();

    let store = SqliteRiskStore::from_config(&config.storage).unwrap();
    store
        .save_events(&[
            event("e1", &["Corruption & Crime"], 0.5, 0.5),
            event("e2", &["Corruption & Crime"], 0.1, 0.1),
            event("e3", &["corruption & crime", "Interstate Conflict"], 0.9, 0.5),
        ])
        .unwrap();

    let aggregator = RiskAggregator::from_config(&config);
    let record = aggregator.aggregate_supply_chain("1", &store, None).unwrap();

    let corruption = record.score(CanonicalCategory::CorruptionCrime).unwrap();
    assert!(corruption > 0.2 && corruption < 0.4809, "corruption = {corruption}");
    assert!(record.score(CanonicalCategory::InterstateConflict).unwrap() > 0.2);
    assert_eq!(record.score(CanonicalCategory::PoliticalViolence), Some(0.1));

    drop(store);
    let reopened = SqliteRiskStore::open(&dir.path().join("risk.db")).unwrap();
    assert_eq!(reopened.get_risk_score("1").unwrap(), Some(record));
}
