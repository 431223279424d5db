//! Fusion throughput benchmarks: factor aggregation, anomaly detection, and
//! ensemble fusion over realistic input sizes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use repute_core::types::component::{ComponentRole, ComponentScore};
use repute_core::types::factor::{RiskFactor, RiskSeverity};
use repute_core::types::snapshot::SubjectSnapshot;
use repute_fusion::{AnomalyDetector, FactorAggregator, FusionEngine};

fn make_factors(n: usize) -> Vec<RiskFactor> {
    (0..n)
        .map(|i| {
            RiskFactor::new(
                format!("factor_{i}"),
                (i % 100) as f64,
                0.1 + (i % 9) as f64 * 0.1,
                RiskSeverity::Medium,
                0.5 + (i % 5) as f64 * 0.1,
                "bench",
            )
            .unwrap()
        })
        .collect()
}

fn make_components(n: usize) -> Vec<ComponentScore> {
    (0..n)
        .map(|i| {
            ComponentScore::new(
                format!("component_{i}"),
                ComponentRole::Classifier,
                (i % 10) as f64 / 10.0,
                0.6 + (i % 4) as f64 * 0.1,
            )
            .unwrap()
        })
        .collect()
}

fn bench_factor_aggregation(c: &mut Criterion) {
    let agg = FactorAggregator::new();
    let factors_100 = make_factors(100);
    let factors_1k = make_factors(1_000);

    c.bench_function("aggregate_100_factors", |b| {
        b.iter(|| {
            let report = agg
                .score("bench.example", black_box(&factors_100), &[], 0.9, 0)
                .unwrap();
            black_box(report);
        })
    });

    c.bench_function("aggregate_1k_factors", |b| {
        b.iter(|| {
            let report = agg
                .score("bench.example", black_box(&factors_1k), &[], 0.9, 0)
                .unwrap();
            black_box(report);
        })
    });
}

fn bench_anomaly_detection(c: &mut Criterion) {
    let detector = AnomalyDetector::new();
    for feature in ["dns_ttl", "mx_count", "domain_age_days", "ssl_age_days"] {
        let values: Vec<f64> = (0..500).map(|i| 100.0 + (i % 50) as f64).collect();
        detector.update_baseline(feature, &values);
    }

    let snapshot = SubjectSnapshot::new("deep.nested.bench.example.tk", 1_700_000_000)
        .with_metric("dns_ttl", 30.0)
        .with_metric("mx_count", 0.0)
        .with_metric("domain_age_days", 900.0)
        .with_metric("ssl_age_days", 2.0);
    let history: Vec<SubjectSnapshot> = (0..50)
        .map(|i| {
            let mut s = SubjectSnapshot::new("bench.example", 1_600_000_000 + i * 86_400);
            s.trust_score = Some(70.0 + (i % 10) as f64);
            s
        })
        .collect();

    c.bench_function("detect_with_history_50", |b| {
        b.iter(|| {
            let anomalies = detector.detect(black_box(&snapshot), black_box(&history));
            black_box(anomalies);
        })
    });
}

fn bench_ensemble_fusion(c: &mut Criterion) {
    let engine = FusionEngine::new();
    let components_5 = make_components(5);
    let components_25 = make_components(25);

    c.bench_function("fuse_5_components", |b| {
        b.iter(|| {
            let verdict = engine.fuse_uncached(black_box(&components_5)).unwrap();
            black_box(verdict);
        })
    });

    c.bench_function("fuse_25_components", |b| {
        b.iter(|| {
            let verdict = engine.fuse_uncached(black_box(&components_25)).unwrap();
            black_box(verdict);
        })
    });
}

criterion_group!(
    benches,
    bench_factor_aggregation,
    bench_anomaly_detection,
    bench_ensemble_fusion
);
criterion_main!(benches);
