//! Confidence calculator tests: interval construction across methods,
//! confidence aggregation, and uncertainty arithmetic.

use repute_core::config::ConfidenceConfig;
use repute_core::types::confidence::IntervalMethod;
use repute_fusion::ConfidenceCalculator;

const METHODS: [IntervalMethod; 5] = [
    IntervalMethod::Wilson,
    IntervalMethod::ClopperPearson,
    IntervalMethod::Normal,
    IntervalMethod::Bootstrap,
    IntervalMethod::Bayesian,
];

// ---- Interval construction ----

#[test]
fn zero_trials_is_maximally_uncertain_not_an_error() {
    let calc = ConfidenceCalculator::new();
    for method in METHODS {
        let r = calc.calculate(0, 0, method).unwrap();
        assert_eq!(r.point_estimate, 0.5);
        assert_eq!(r.lower_bound, 0.0);
        assert_eq!(r.upper_bound, 1.0);
        assert_eq!(r.sample_size, 0);
        assert!(r.standard_error.is_none());
    }
}

#[test]
fn wilson_95_of_100() {
    let calc = ConfidenceCalculator::new();
    let r = calc.calculate(95, 100, IntervalMethod::Wilson).unwrap();
    assert!((r.point_estimate - 0.95).abs() < 1e-12);
    // Wilson bounds for p = 0.95, n = 100, z = 1.96.
    assert!((r.lower_bound - 0.8883).abs() < 1e-3);
    assert!((r.upper_bound - 0.9785).abs() < 1e-3);
}

#[test]
fn interval_ordering_holds_for_every_method() {
    let calc = ConfidenceCalculator::new();
    let cases = [(0u64, 5u64), (5, 5), (1, 10), (9, 10), (50, 100), (1, 1)];
    for method in METHODS {
        for (s, t) in cases {
            let r = calc.calculate(s, t, method).unwrap();
            assert!(
                0.0 <= r.lower_bound
                    && r.lower_bound <= r.point_estimate
                    && r.point_estimate <= r.upper_bound
                    && r.upper_bound <= 1.0,
                "{method} violated ordering at {s}/{t}: {r:?}"
            );
        }
    }
}

#[test]
fn wilson_converges_to_normal_for_large_n() {
    let calc = ConfidenceCalculator::new();
    for &n in &[100_000u64, 1_000_000] {
        let s = n * 3 / 10;
        let wilson = calc.calculate(s, n, IntervalMethod::Wilson).unwrap();
        let normal = calc.calculate(s, n, IntervalMethod::Normal).unwrap();
        assert!((wilson.lower_bound - normal.lower_bound).abs() < 1e-4);
        assert!((wilson.upper_bound - normal.upper_bound).abs() < 1e-4);
    }
}

#[test]
fn clopper_pearson_is_wider_than_wilson() {
    let calc = ConfidenceCalculator::new();
    let cp = calc.calculate(8, 10, IntervalMethod::ClopperPearson).unwrap();
    let wilson = calc.calculate(8, 10, IntervalMethod::Wilson).unwrap();
    assert!(cp.width() >= wilson.width());
}

#[test]
fn bayesian_boundaries_pin_to_zero_and_one() {
    let calc = ConfidenceCalculator::new();
    let r = calc.calculate(0, 20, IntervalMethod::Bayesian).unwrap();
    assert_eq!(r.lower_bound, 0.0);
    let r = calc.calculate(20, 20, IntervalMethod::Bayesian).unwrap();
    assert_eq!(r.upper_bound, 1.0);
}

#[test]
fn rejects_malformed_arguments() {
    let calc = ConfidenceCalculator::new();
    assert!(calc.calculate(6, 5, IntervalMethod::Wilson).is_err());
    assert!(calc
        .calculate_at_level(1, 5, IntervalMethod::Wilson, 0.0)
        .is_err());
    assert!(calc
        .calculate_at_level(1, 5, IntervalMethod::Wilson, 1.0)
        .is_err());
    assert!(calc
        .calculate_at_level(1, 5, IntervalMethod::Wilson, -0.5)
        .is_err());
}

#[test]
fn coverage_level_widens_interval() {
    let calc = ConfidenceCalculator::new();
    let narrow = calc
        .calculate_at_level(40, 80, IntervalMethod::Wilson, 0.90)
        .unwrap();
    let wide = calc
        .calculate_at_level(40, 80, IntervalMethod::Wilson, 0.99)
        .unwrap();
    assert!(wide.width() > narrow.width());
}

// ---- Reputation-scale interval ----

#[test]
fn reputation_interval_uses_minimum_sample_size() {
    let calc = ConfidenceCalculator::new();
    // 3 factors floor up to n = 10; a 95 score truncates to 9 successes.
    let (lower, upper) = calc.interval_for_reputation(95.0, 3).unwrap();
    let reference = calc.calculate(9, 10, IntervalMethod::Wilson).unwrap();
    assert!((lower - reference.lower_bound * 100.0).abs() < 1e-9);
    assert!((upper - reference.upper_bound * 100.0).abs() < 1e-9);
    assert!(0.0 <= lower && lower <= upper && upper <= 100.0);
}

#[test]
fn reputation_interval_rejects_out_of_range_score() {
    let calc = ConfidenceCalculator::new();
    assert!(calc.interval_for_reputation(101.0, 5).is_err());
    assert!(calc.interval_for_reputation(-1.0, 5).is_err());
    assert!(calc.interval_for_reputation(f64::NAN, 5).is_err());
}

// ---- Confidence aggregation ----

#[test]
fn geometric_mean_punishes_weak_links() {
    let calc = ConfidenceCalculator::new();
    let strong = calc.aggregate_confidence(&[0.9, 0.9, 0.9], None).unwrap();
    let weak_link = calc.aggregate_confidence(&[0.9, 0.9, 0.05], None).unwrap();
    // One near-zero confidence drags the aggregate far below the
    // arithmetic mean (~0.617).
    assert!(weak_link < 0.45);
    assert!(strong > weak_link + 0.3);
}

#[test]
fn corroboration_bonus_rewards_more_signals() {
    let calc = ConfidenceCalculator::new();
    let two = calc.aggregate_confidence(&[0.8, 0.8], None).unwrap();
    let five = calc
        .aggregate_confidence(&[0.8, 0.8, 0.8, 0.8, 0.8], None)
        .unwrap();
    // Identical geometric mean, larger bonus.
    assert!((two - (0.8 + 0.04)).abs() < 1e-9);
    assert!((five - (0.8 + 0.10)).abs() < 1e-9);
}

#[test]
fn corroboration_bonus_caps() {
    let calc = ConfidenceCalculator::new();
    let many = vec![0.7; 50];
    let agg = calc.aggregate_confidence(&many, None).unwrap();
    assert!((agg - (0.7 + 0.2)).abs() < 1e-9);
}

#[test]
fn aggregate_confidence_never_exceeds_one() {
    let calc = ConfidenceCalculator::new();
    let agg = calc.aggregate_confidence(&[1.0; 30], None).unwrap();
    assert_eq!(agg, 1.0);
}

#[test]
fn weights_shift_the_aggregate() {
    let calc = ConfidenceCalculator::new();
    let toward_low = calc
        .aggregate_confidence(&[0.9, 0.3], Some(&[1.0, 9.0]))
        .unwrap();
    let toward_high = calc
        .aggregate_confidence(&[0.9, 0.3], Some(&[9.0, 1.0]))
        .unwrap();
    assert!(toward_low < toward_high);
}

#[test]
fn mismatched_weights_fall_back_to_uniform() {
    let calc = ConfidenceCalculator::new();
    let uniform = calc.aggregate_confidence(&[0.9, 0.3], None).unwrap();
    let mismatched = calc
        .aggregate_confidence(&[0.9, 0.3], Some(&[1.0, 2.0, 3.0]))
        .unwrap();
    assert_eq!(uniform, mismatched);
}

#[test]
fn empty_confidences_aggregate_to_zero() {
    let calc = ConfidenceCalculator::new();
    assert_eq!(calc.aggregate_confidence(&[], None).unwrap(), 0.0);
}

#[test]
fn aggregate_confidence_rejects_out_of_range() {
    let calc = ConfidenceCalculator::new();
    assert!(calc.aggregate_confidence(&[0.5, 1.1], None).is_err());
    assert!(calc.aggregate_confidence(&[f64::NAN], None).is_err());
}

// ---- Uncertainty ----

#[test]
fn uncertainty_is_the_documented_weighted_sum() {
    let calc = ConfidenceCalculator::new();
    // (1-0.8)*0.30 + (1-0.9)*0.25 + (1/sqrt(25))*0.25 + (84/168)*0.20
    let u = calc.calculate_uncertainty(0.8, 0.9, 25, 84.0).unwrap();
    assert!((u - 0.235).abs() < 1e-9);
}

#[test]
fn staleness_saturates_at_one_week() {
    let calc = ConfidenceCalculator::new();
    let week = calc.calculate_uncertainty(1.0, 1.0, 10_000, 168.0).unwrap();
    let year = calc.calculate_uncertainty(1.0, 1.0, 10_000, 8760.0).unwrap();
    assert!((week - year).abs() < 1e-12);
}

#[test]
fn zero_sample_size_counts_as_one() {
    let calc = ConfidenceCalculator::new();
    let zero = calc.calculate_uncertainty(1.0, 1.0, 0, 0.0).unwrap();
    let one = calc.calculate_uncertainty(1.0, 1.0, 1, 0.0).unwrap();
    assert_eq!(zero, one);
    assert!((zero - 0.25).abs() < 1e-12);
}

#[test]
fn uncertainty_rejects_out_of_range_terms() {
    let calc = ConfidenceCalculator::new();
    assert!(calc.calculate_uncertainty(1.5, 0.5, 10, 1.0).is_err());
    assert!(calc.calculate_uncertainty(0.5, -0.1, 10, 1.0).is_err());
    assert!(calc.calculate_uncertainty(0.5, 0.5, 10, -1.0).is_err());
}

// ---- Configuration ----

#[test]
fn corroboration_constants_are_tunable() {
    let calc = ConfidenceCalculator::with_config(ConfidenceConfig {
        corroboration_step: 0.0,
        corroboration_cap: 0.0,
        ..ConfidenceConfig::default()
    });
    // With the bonus disabled, equal confidences aggregate to themselves.
    let agg = calc.aggregate_confidence(&[0.8, 0.8, 0.8], None).unwrap();
    assert!((agg - 0.8).abs() < 1e-9);
}
