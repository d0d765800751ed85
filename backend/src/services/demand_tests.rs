use super::*;
use crate::api::{Coordinates, MetricSummary};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

fn summary_of(mean: f64) -> MetricSummary {
    MetricSummary {
        mean,
        std: 0.0,
        min: mean,
        max: mean,
        count: 1,
    }
}

fn locality(name: &str, metrics: &[(Metric, f64)]) -> LocalitySummary {
    metrics.iter().fold(
        LocalitySummary::new(name, Coordinates::default()),
        |summary, &(metric, mean)| summary.with_metric(metric, summary_of(mean)),
    )
}

fn three_localities() -> Vec<LocalitySummary> {
    vec![
        locality("A", &[(Metric::Throughput, 50.0), (Metric::SignalStrength, -60.0)]),
        locality("B", &[(Metric::Throughput, 10.0), (Metric::SignalStrength, -95.0)]),
        locality("C", &[(Metric::Throughput, 30.0), (Metric::SignalStrength, -80.0)]),
    ]
}

fn names(ranked: &[DemandScore]) -> Vec<&str> {
    ranked.iter().map(|d| d.locality.as_str()).collect()
}

#[test]
fn test_composite_ranks_three_localities() {
    let ranking = rank(&three_localities(), "composite").unwrap();

    assert_eq!(names(&ranking.ranked), vec!["A", "C", "B"]);
    assert_eq!(
        ranking.ranked.iter().map(|d| d.rank).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    // Fewer than five localities: the slice holds all of them
    assert_eq!(ranking.top_n.len(), 3);
    assert_eq!(ranking.statistics.total_localities, 3);
    assert!((ranking.ranked[0].score - 2.0).abs() < 1e-9);
    assert!(ranking.ranked[2].score.abs() < 1e-9);
}

#[test]
fn test_latency_inverted_in_composite() {
    let summaries = vec![
        locality("Slow", &[(Metric::Throughput, 20.0), (Metric::Latency, 50.0)]),
        locality("Fast", &[(Metric::Throughput, 20.0), (Metric::Latency, 10.0)]),
    ];
    let ranking = rank(&summaries, "composite").unwrap();

    assert_eq!(names(&ranking.ranked), vec!["Fast", "Slow"]);
    assert!(ranking.ranked[0].score > ranking.ranked[1].score);
}

#[test]
fn test_single_latency_selector_inverts() {
    let summaries = vec![
        locality("Slow", &[(Metric::Latency, 50.0)]),
        locality("Fast", &[(Metric::Latency, 10.0)]),
    ];
    let ranking = rank(&summaries, "latency").unwrap();

    assert_eq!(names(&ranking.ranked), vec!["Fast", "Slow"]);
    assert!((ranking.ranked[0].score - 40.0).abs() < 1e-9);
    assert_eq!(ranking.ranked[1].score, 0.0);
}

#[test]
fn test_single_metric_skips_localities_without_it() {
    let summaries = vec![
        locality("A", &[(Metric::Throughput, 5.0)]),
        locality("B", &[(Metric::SignalStrength, -70.0)]),
        locality("Empty", &[]),
    ];

    let ranking = rank(&summaries, "throughput").unwrap();
    assert_eq!(names(&ranking.ranked), vec!["A"]);

    let composite = rank(&summaries, "composite").unwrap();
    assert_eq!(composite.ranked.len(), 2);
    assert!(!names(&composite.ranked).contains(&"Empty"));
}

#[test]
fn test_ties_break_by_name() {
    let summaries = vec![
        locality("Zeta", &[(Metric::Throughput, 10.0)]),
        locality("Alpha", &[(Metric::Throughput, 10.0)]),
        locality("Mid", &[(Metric::Throughput, 10.0)]),
    ];
    let ranking = rank(&summaries, "throughput").unwrap();
    assert_eq!(names(&ranking.ranked), vec!["Alpha", "Mid", "Zeta"]);
}

#[test]
fn test_unknown_selector_rejected() {
    let err = rank(&three_localities(), "weighted").unwrap_err();
    assert_eq!(err.code(), "INVALID_SELECTOR");
}

#[test]
fn test_empty_input_has_absent_statistics() {
    let ranking = rank(&[], "composite").unwrap();
    assert!(ranking.ranked.is_empty());
    assert!(ranking.top_n.is_empty());
    assert_eq!(ranking.statistics.mean, None);
    assert_eq!(ranking.statistics.max, None);
    assert_eq!(ranking.statistics.total_localities, 0);
}

#[test]
fn test_top_n_truncates() {
    let summaries: Vec<LocalitySummary> = (0..8)
        .map(|i| locality(&format!("L{}", i), &[(Metric::Throughput, i as f64)]))
        .collect();
    let ranking = rank(&summaries, "throughput").unwrap();

    assert_eq!(ranking.ranked.len(), 8);
    assert_eq!(ranking.top_n.len(), DEFAULT_TOP_N);
    assert_eq!(ranking.top_n[0].locality, "L7");

    let top_two = rank_with_top_n(&summaries, DemandSelector::Composite, 2);
    assert_eq!(names(&top_two.top_n), vec!["L7", "L6"]);
}

#[test]
fn test_summarize_localities_follows_registry_order() {
    let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let records = vec![
        TelemetryRecord::new("Gaya", "4G", t0).with_throughput(10.0),
        TelemetryRecord::new("Patna", "4G", t0).with_throughput(20.0).with_latency(30.0),
        TelemetryRecord::new("Patna", "5G", t0 + Duration::hours(1)).with_throughput(40.0),
    ];
    let registry = LocalityRegistry::new(vec![
        crate::api::Locality {
            name: "Patna".to_string(),
            coordinates: Coordinates::new(25.6, 85.1),
        },
        crate::api::Locality {
            name: "Gaya".to_string(),
            coordinates: Coordinates::new(24.8, 85.0),
        },
    ]);
    let refs: Vec<&TelemetryRecord> = records.iter().collect();
    let summaries = summarize_localities(&refs, &registry);

    assert_eq!(summaries[0].locality, "Patna");
    assert_eq!(summaries[0].coordinates, Coordinates::new(25.6, 85.1));
    assert_eq!(summaries[0].mean(Metric::Throughput), Some(30.0));
    assert_eq!(summaries[0].metrics[&Metric::Latency].count, 1);
    assert_eq!(summaries[1].mean(Metric::Latency), None);
}

#[test]
fn test_location_demand_end_to_end() {
    let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut records = Vec::new();
    let profiles = [("A", 50.0, -60.0), ("B", 10.0, -95.0), ("C", 30.0, -80.0)];
    for (name, throughput, signal) in profiles {
        for i in 0..4 {
            records.push(
                TelemetryRecord::new(name, "4G", t0 + Duration::hours(i))
                    .with_throughput(throughput)
                    .with_signal_strength(signal)
                    .with_position(25.0, 85.0),
            );
        }
    }
    let registry = LocalityRegistry::from_records(&records);
    let view = location_demand(
        &records,
        &registry,
        DemandSelector::Composite,
        TimeRange::Current,
        DEFAULT_TOP_N,
        VisualScale::default(),
    );

    assert_eq!(names(&view.ranked_localities), vec!["A", "C", "B"]);
    assert_eq!(view.top_5_high_demand.len(), 3);
    assert_eq!(view.markers.len(), 3);
    assert_eq!(view.markers[0].locality, "A");
    assert_eq!(view.metric, DemandSelector::Composite);
}

proptest! {
    #[test]
    fn prop_ranks_are_a_permutation(means in proptest::collection::vec(0.0f64..100.0, 0..30)) {
        let summaries: Vec<LocalitySummary> = means
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                let metrics = [(Metric::Throughput, m), (Metric::Latency, 100.0 - m)];
                locality(&format!("L{:02}", i), &metrics)
            })
            .collect();
        let ranking = rank(&summaries, "composite").unwrap();

        let ranks: Vec<usize> = ranking.ranked.iter().map(|d| d.rank).collect();
        prop_assert_eq!(ranks, (1..=summaries.len()).collect::<Vec<_>>());
        for pair in ranking.ranked.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].locality < pair[1].locality)
            );
        }
    }
}
