//! Locality demand scoring and ranking.
//!
//! Scores are oriented so that a higher number always means higher demand
//! pressure. Latency is the one metric where a lower reading is better, so it
//! is inverted both as a single-metric score (`max_latency - mean`) and inside
//! the composite (`(max - v) / (max - min)`).

use log::debug;
use std::collections::{BTreeMap, HashMap};

use super::presentation::{demand_markers, VisualScale};
use super::registry::LocalityRegistry;
use super::stats::compute_stats;
use crate::api::{
    AnalyticsResult, DemandRanking, DemandScore, DemandSelector, LocalitySummary, LocationDemand,
    Metric, ScoreStatistics, TelemetryRecord, TimeRange,
};

/// Number of localities in the high-demand slice.
pub const DEFAULT_TOP_N: usize = 5;

/// Build per-locality metric summaries from raw records.
///
/// Localities appear in registry order first, then any unregistered
/// localities in first-seen order. Metrics without observations for a
/// locality are left out of its summary.
pub fn summarize_localities(
    records: &[&TelemetryRecord],
    registry: &LocalityRegistry,
) -> Vec<LocalitySummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&TelemetryRecord>> = HashMap::new();
    for record in records {
        grouped
            .entry(record.locality.as_str())
            .or_insert_with(|| {
                order.push(record.locality.as_str());
                Vec::new()
            })
            .push(record);
    }

    order.sort_by_key(|name| registry.position(name).unwrap_or(usize::MAX));

    order
        .into_iter()
        .map(|name| {
            let group = grouped.get(name).map(Vec::as_slice).unwrap_or(&[]);
            let mut summary = LocalitySummary::new(name, registry.coordinates_of(name));
            for metric in Metric::ALL {
                let values: Vec<f64> = group.iter().filter_map(|r| metric.read(r)).collect();
                if let Some(stats) = compute_stats(&values) {
                    summary.metrics.insert(metric, stats);
                }
            }
            summary
        })
        .collect()
}

/// Rank localities by a selector given by name.
///
/// Fails with `InvalidSelector` for names outside
/// `composite | throughput | signal_strength | latency`.
pub fn rank(summaries: &[LocalitySummary], selector: &str) -> AnalyticsResult<DemandRanking> {
    let selector: DemandSelector = selector.parse()?;
    Ok(rank_with_top_n(summaries, selector, DEFAULT_TOP_N))
}

/// Rank localities, keeping the first `top_n` entries as the high-demand slice.
pub fn rank_with_top_n(
    summaries: &[LocalitySummary],
    selector: DemandSelector,
    top_n: usize,
) -> DemandRanking {
    let mut scored = score_localities(summaries, selector);
    scored.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| a.0.locality.cmp(&b.0.locality))
    });

    let ranked: Vec<DemandScore> = scored
        .into_iter()
        .enumerate()
        .map(|(i, (summary, score))| DemandScore {
            locality: summary.locality.clone(),
            score,
            rank: i + 1,
            coordinates: summary.coordinates,
            statistics: summary.metrics.clone(),
        })
        .collect();

    let scores: Vec<f64> = ranked.iter().map(|d| d.score).collect();
    let statistics = match compute_stats(&scores) {
        Some(stats) => ScoreStatistics {
            mean: Some(stats.mean),
            std: Some(stats.std),
            min: Some(stats.min),
            max: Some(stats.max),
            total_localities: stats.count,
        },
        None => ScoreStatistics::default(),
    };

    let top_n = ranked.iter().take(top_n).cloned().collect();

    DemandRanking {
        ranked,
        statistics,
        top_n,
    }
}

/// Score every locality that has data for the selector. Localities without
/// it are dropped, so ranks only cover the non-empty set.
fn score_localities(
    summaries: &[LocalitySummary],
    selector: DemandSelector,
) -> Vec<(&LocalitySummary, f64)> {
    match selector {
        DemandSelector::Single(metric) => {
            let with_metric: Vec<(&LocalitySummary, f64)> = summaries
                .iter()
                .filter_map(|s| s.mean(metric).map(|m| (s, m)))
                .collect();
            if !metric.lower_is_better() {
                return with_metric;
            }
            let max_observed = with_metric
                .iter()
                .map(|(_, m)| *m)
                .fold(f64::NEG_INFINITY, f64::max);
            with_metric
                .into_iter()
                .map(|(s, m)| (s, max_observed - m))
                .collect()
        }
        DemandSelector::Composite => {
            let ranges = metric_ranges(summaries);
            summaries
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| {
                    let score = s
                        .metrics
                        .iter()
                        .filter_map(|(metric, stats)| {
                            ranges
                                .get(metric)
                                .map(|&(min, max)| normalize(*metric, stats.mean, min, max))
                        })
                        .sum();
                    (s, score)
                })
                .collect()
        }
    }
}

/// Min and max of each metric's locality means, over the localities that
/// have the metric.
fn metric_ranges(summaries: &[LocalitySummary]) -> BTreeMap<Metric, (f64, f64)> {
    let mut ranges: BTreeMap<Metric, (f64, f64)> = BTreeMap::new();
    for summary in summaries {
        for (metric, stats) in &summary.metrics {
            let range = ranges
                .entry(*metric)
                .or_insert((f64::INFINITY, f64::NEG_INFINITY));
            range.0 = range.0.min(stats.mean);
            range.1 = range.1.max(stats.mean);
        }
    }
    ranges
}

/// Min-max normalise into [0, 1], inverted for lower-is-better metrics.
/// A degenerate range contributes nothing.
fn normalize(metric: Metric, value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= f64::EPSILON {
        return 0.0;
    }
    if metric.lower_is_better() {
        (max - value) / span
    } else {
        (value - min) / span
    }
}

/// Location demand view over a telemetry snapshot.
pub fn location_demand(
    records: &[TelemetryRecord],
    registry: &LocalityRegistry,
    selector: DemandSelector,
    time_range: TimeRange,
    top_n: usize,
    scale: VisualScale,
) -> LocationDemand {
    let selected = time_range.select(records);
    debug!(
        "Ranking {} localities by {} over {} records ({})",
        registry.len(),
        selector,
        selected.len(),
        time_range
    );

    let summaries = summarize_localities(&selected, registry);
    let ranking = rank_with_top_n(&summaries, selector, top_n);
    let markers = demand_markers(&ranking.ranked, scale);

    LocationDemand {
        metric: selector,
        time_range,
        ranked_localities: ranking.ranked,
        statistics: ranking.statistics,
        top_5_high_demand: ranking.top_n,
        markers,
    }
}

#[cfg(test)]
#[path = "demand_tests.rs"]
mod demand_tests;
