//! Aggregation pipeline: route → estimate per category → assemble → persist.

use std::time::Instant;

use chainrisk_core::config::{AggregationConfig, ChainRiskConfig, SamplingFailurePolicy};
use chainrisk_core::constants::{DEFAULT_KAPPA, DEFAULT_NO_DATA_SCORE};
use chainrisk_core::errors::{AggregationError, SamplingError};
use chainrisk_core::traits::{Cancellable, CancellationToken, RiskScoreStore};
use chainrisk_core::types::{CanonicalCategory, ClassifiedEvent, RiskScoreRecord};
use rayon::prelude::*;

use crate::assembly::{assemble, CategoryScores};
use crate::posterior::{BetaPrior, MetropolisConfig, MetropolisEstimator, PosteriorEstimator};
use crate::routing::{route_severities, CategorySeverityPool};

/// Explicit settings for one aggregator. Build from a resolved
/// [`ChainRiskConfig`] with [`AggregationSettings::from_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationSettings {
    pub kappa: f64,
    pub default_no_data_score: f64,
    pub prior: BetaPrior,
    pub failure_policy: SamplingFailurePolicy,
    pub parallel: bool,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            kappa: DEFAULT_KAPPA,
            default_no_data_score: DEFAULT_NO_DATA_SCORE,
            prior: BetaPrior::default(),
            failure_policy: SamplingFailurePolicy::default(),
            parallel: true,
        }
    }
}

impl AggregationSettings {
    pub fn from_config(config: &AggregationConfig) -> Self {
        Self {
            kappa: config.effective_kappa(),
            default_no_data_score: config.effective_default_no_data_score(),
            prior: BetaPrior::new(config.effective_prior_alpha(), config.effective_prior_beta()),
            failure_policy: config.effective_failure_policy(),
            parallel: config.effective_parallel(),
        }
    }
}

/// How a category's score was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    /// Posterior mean over `observations` severities.
    Sampled { observations: usize },
    /// No routed severities; the no-data score was used.
    NoData,
    /// The estimator failed and the policy substituted the no-data score.
    FellBack { error: SamplingError },
}

/// Scores plus per-category provenance, in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    pub scores: CategoryScores,
    pub outcomes: [CategoryOutcome; CanonicalCategory::COUNT],
}

impl CategoryReport {
    pub fn outcome(&self, category: CanonicalCategory) -> &CategoryOutcome {
        &self.outcomes[category.index()]
    }

    pub fn fallback_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CategoryOutcome::FellBack { .. }))
            .count()
    }
}

/// Computes and persists per-category risk scores for supply chains.
#[derive(Debug, Clone)]
pub struct RiskAggregator<E = MetropolisEstimator> {
    settings: AggregationSettings,
    estimator: E,
}

impl RiskAggregator<MetropolisEstimator> {
    /// Aggregator with the sampling estimator, configured from a resolved config.
    pub fn from_config(config: &ChainRiskConfig) -> Self {
        let settings = AggregationSettings::from_config(&config.aggregation);
        let estimator =
            MetropolisEstimator::new(settings.prior, MetropolisConfig::from_config(&config.sampler));
        Self::new(settings, estimator)
    }
}

impl<E: PosteriorEstimator> RiskAggregator<E> {
    pub fn new(settings: AggregationSettings, estimator: E) -> Self {
        Self { settings, estimator }
    }

    pub fn settings(&self) -> &AggregationSettings {
        &self.settings
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Score events without persisting anything.
    pub fn score_events(&self, events: &[ClassifiedEvent]) -> Result<CategoryReport, AggregationError> {
        let pool = route_severities(events);
        self.score_pool(&pool)
    }

    /// Route, estimate, assemble, and upsert the record for `supply_chain_id`.
    ///
    /// The record is persisted only once all six categories have resolved.
    /// A cancelled token is honored before estimation and before the write.
    pub fn compute_category_risk_scores(
        &self,
        supply_chain_id: &str,
        events: &[ClassifiedEvent],
        store: &dyn RiskScoreStore,
        cancel: Option<&CancellationToken>,
    ) -> Result<RiskScoreRecord, AggregationError> {
        let start = Instant::now();
        check_cancelled(cancel)?;

        let pool = route_severities(events);
        let report = self.score_pool(&pool)?;

        check_cancelled(cancel)?;
        let record = assemble(supply_chain_id, &report.scores);
        store.upsert_risk_score(&record)?;

        tracing::info!(
            supply_chain_id,
            events = events.len(),
            observations = pool.total_observations(),
            fallbacks = report.fallback_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "computed category risk scores"
        );
        Ok(record)
    }

    /// Fetch the supply chain's relevant assessed events from the store and
    /// recompute its record.
    pub fn aggregate_supply_chain(
        &self,
        supply_chain_id: &str,
        store: &dyn RiskScoreStore,
        cancel: Option<&CancellationToken>,
    ) -> Result<RiskScoreRecord, AggregationError> {
        check_cancelled(cancel)?;
        let events = store.get_events_for_supply_chain(supply_chain_id)?;
        self.compute_category_risk_scores(supply_chain_id, &events, store, cancel)
    }

    fn score_pool(&self, pool: &CategorySeverityPool) -> Result<CategoryReport, AggregationError> {
        let work: Vec<(CanonicalCategory, &[f64])> = pool.iter().collect();
        let resolved: Vec<(f64, CategoryOutcome)> = if self.settings.parallel {
            work.par_iter()
                .map(|&(cat, severities)| self.score_category(cat, severities))
                .collect::<Result<_, _>>()?
        } else {
            work.iter()
                .map(|&(cat, severities)| self.score_category(cat, severities))
                .collect::<Result<_, _>>()?
        };

        let mut scores = CategoryScores::filled(self.settings.default_no_data_score);
        let mut outcomes: [CategoryOutcome; CanonicalCategory::COUNT] =
            std::array::from_fn(|_| CategoryOutcome::NoData);
        for ((cat, _), (score, outcome)) in work.iter().zip(resolved) {
            scores.set(*cat, score);
            outcomes[cat.index()] = outcome;
        }
        Ok(CategoryReport { scores, outcomes })
    }

    fn score_category(
        &self,
        category: CanonicalCategory,
        severities: &[f64],
    ) -> Result<(f64, CategoryOutcome), SamplingError> {
        if severities.is_empty() {
            tracing::debug!(%category, observations = 0, "no data, using default score");
            return Ok((self.settings.default_no_data_score, CategoryOutcome::NoData));
        }

        let observations = severities.len();
        match self.estimator.estimate(severities, self.settings.kappa) {
            Ok(score) => {
                tracing::debug!(%category, observations, score, "estimated category risk");
                Ok((score, CategoryOutcome::Sampled { observations }))
            }
            Err(failure) => {
                let error = SamplingError::new(category, observations, failure);
                match self.settings.failure_policy {
                    SamplingFailurePolicy::Abort => Err(error),
                    SamplingFailurePolicy::UseDefault => {
                        tracing::warn!(
                            %category,
                            observations,
                            error = %error.failure,
                            default_score = self.settings.default_no_data_score,
                            "estimation failed, substituting default score"
                        );
                        Ok((
                            self.settings.default_no_data_score,
                            CategoryOutcome::FellBack { error },
                        ))
                    }
                }
            }
        }
    }
}

fn check_cancelled(cancel: Option<&CancellationToken>) -> Result<(), AggregationError> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(AggregationError::Cancelled),
        _ => Ok(()),
    }
}
