//! Property tests for normalization, routing, and the no-data path.

use chainrisk_analysis::{
    assemble, normalize_severity, route_severities, AggregationSettings, CategoryScores,
    GridEstimator, PosteriorEstimator, RiskAggregator,
};
use chainrisk_core::types::{CanonicalCategory, ClassifiedEvent, EventAssessment, Impact, Likelihood, RiskCategoryLabel};
use proptest::prelude::*;

fn scale_value() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![0.001, 0.01, 0.1, 0.5, 0.9])
}

fn category() -> impl Strategy<Value = CanonicalCategory> {
    prop::sample::select(CanonicalCategory::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_scale_pairs_normalize_into_unit_interval(l in scale_value(), i in scale_value()) {
        let s = normalize_severity(l, i).unwrap();
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn prop_normalization_is_monotone(a in scale_value(), b in scale_value(), other in scale_value()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(normalize_severity(lo, other).unwrap() <= normalize_severity(hi, other).unwrap());
        prop_assert!(normalize_severity(other, lo).unwrap() <= normalize_severity(other, hi).unwrap());
    }

    #[test]
    fn prop_off_scale_values_rejected(v in 0.0f64..1.0) {
        let on_scale = Likelihood::ALL.iter().any(|l| (l.value() - v).abs() < 1e-6);
        prop_assume!(!on_scale);
        prop_assert!(normalize_severity(v, 0.5).is_err());
        prop_assert!(normalize_severity(0.5, v).is_err());
    }

    #[test]
    fn prop_empty_category_gets_default_for_any_kappa(
        kappa in 0.1f64..200.0,
        default in 0.0f64..=1.0,
    ) {
        let settings = AggregationSettings {
            kappa,
            default_no_data_score: default,
            ..Default::default()
        };
        let aggregator = RiskAggregator::new(settings, GridEstimator::default());
        let report = aggregator.score_events(&[]).unwrap();
        for cat in CanonicalCategory::ALL {
            prop_assert_eq!(report.scores.get(cat), default);
        }
    }

    #[test]
    fn prop_routed_family_feeds_only_its_category(cat in category(), severity in 0.0f64..=1.0) {
        let event = ClassifiedEvent::new("e", "e")
            .with_label(RiskCategoryLabel::new("Geopolitical", [cat.display_name().to_uppercase()]))
            .with_assessment(EventAssessment {
                is_relevant: true,
                likelihood: Some(0.5),
                impact: Some(0.5),
                severity: Some(severity),
                rationale: None,
            });
        let pool = route_severities(&[event]);
        for (other, severities) in pool.iter() {
            if other == cat {
                prop_assert_eq!(severities, &[severity][..]);
            } else {
                prop_assert!(severities.is_empty());
            }
        }
    }

    #[test]
    fn prop_posterior_mean_stays_in_unit_interval(
        severities in prop::collection::vec(0.0f64..=1.0, 1..30),
        kappa in 0.5f64..100.0,
    ) {
        let mean = GridEstimator::default().estimate(&severities, kappa).unwrap();
        prop_assert!(mean > 0.0 && mean < 1.0);
    }

    #[test]
    fn prop_assembly_is_deterministic(values in prop::array::uniform6(0.0f64..=1.0)) {
        let scores = CategoryScores::from_fn(|cat| values[cat.index()]);
        let a = serde_json::to_vec(&assemble("sc", &scores)).unwrap();
        let b = serde_json::to_vec(&assemble("sc", &scores)).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn test_all_twenty_five_pairs_have_exact_endpoints() {
    let mut count = 0;
    for l in Likelihood::ALL {
        for i in Impact::ALL {
            let s = normalize_severity(l.value(), i.value()).unwrap();
            assert!((0.0..=1.0).contains(&s));
            count += 1;
        }
    }
    assert_eq!(count, 25);
    assert_eq!(normalize_severity(0.001, 0.001).unwrap(), 0.0);
    assert_eq!(normalize_severity(0.9, 0.9).unwrap(), 1.0);
}

#[test]
fn test_financial_class_routes_nowhere() {
    let event = ClassifiedEvent::new("e", "e")
        .with_label(RiskCategoryLabel::new("Financial", ["Political Violence"]))
        .with_assessment(EventAssessment {
            is_relevant: true,
            likelihood: Some(0.5),
            impact: Some(0.5),
            severity: Some(0.55),
            rationale: None,
        });
    assert_eq!(route_severities(&[event]).total_observations(), 0);
}
