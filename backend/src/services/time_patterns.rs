//! Temporal demand patterns: hourly and day-of-week averages, the hour×day
//! heatmap, peak hours and tertile demand clusters.
//!
//! Hour and weekday are read in UTC. Every mapping is sparse: a key with no
//! observations is absent rather than zero.

use log::debug;
use std::collections::BTreeMap;

use super::stats::{mean, population_std, quantile_sorted, sort_values};
use crate::api::{
    AnalyticsResult, DemandCluster, HeatmapCell, Metric, TelemetryRecord, TimePattern,
};

const CLUSTER_LABELS: [&str; 3] = ["Low Demand", "Medium Demand", "High Demand"];

/// Build the time pattern of `metric_name` over `records`.
///
/// An unknown metric name is a malformed request; records that simply
/// lack the metric are skipped.
pub fn build(records: &[&TelemetryRecord], metric_name: &str) -> AnalyticsResult<TimePattern> {
    let metric: Metric = metric_name.parse()?;
    Ok(build_for(records, metric))
}

pub fn build_for(records: &[&TelemetryRecord], metric: Metric) -> TimePattern {
    let observations: Vec<(u32, u32, f64)> = records
        .iter()
        .filter_map(|r| metric.read(r).map(|v| (r.hour(), r.weekday(), v)))
        .collect();

    debug!(
        "Building {} time pattern from {} of {} records",
        metric,
        observations.len(),
        records.len()
    );

    let mut by_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    let mut by_day: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    let mut by_cell: BTreeMap<(u32, u32), Vec<f64>> = BTreeMap::new();
    for &(hour, day, value) in &observations {
        by_hour.entry(hour).or_default().push(value);
        by_day.entry(day).or_default().push(value);
        by_cell.entry((hour, day)).or_default().push(value);
    }

    let hourly_averages = averages(by_hour);
    let daily_patterns = averages(by_day);
    let heatmap = by_cell
        .into_iter()
        .filter_map(|((hour, day), values)| {
            mean(&values).map(|value| HeatmapCell { hour, day, value })
        })
        .collect();
    let peak_hours = peak_hours(&hourly_averages);

    let values: Vec<f64> = observations.iter().map(|&(_, _, v)| v).collect();
    let demand_clusters = tertile_clusters(&values, metric);

    TimePattern {
        metric,
        total_records: observations.len(),
        hourly_averages,
        daily_patterns,
        heatmap,
        peak_hours,
        demand_clusters,
    }
}

fn averages(groups: BTreeMap<u32, Vec<f64>>) -> BTreeMap<u32, f64> {
    groups
        .into_iter()
        .filter_map(|(key, values)| mean(&values).map(|m| (key, m)))
        .collect()
}

/// Hours whose average is strictly above mean + 1 population std of the
/// hourly averages. Empty with fewer than two distinct averages.
pub fn peak_hours(hourly_averages: &BTreeMap<u32, f64>) -> Vec<u32> {
    let mut values: Vec<f64> = hourly_averages.values().copied().collect();
    sort_values(&mut values);
    values.dedup();
    if values.len() < 2 {
        return Vec::new();
    }

    let all: Vec<f64> = hourly_averages.values().copied().collect();
    let (Some(m), Some(sd)) = (mean(&all), population_std(&all)) else {
        return Vec::new();
    };
    let threshold = m + sd;

    // BTreeMap iteration keeps the hours ascending
    hourly_averages
        .iter()
        .filter(|(_, &avg)| avg > threshold)
        .map(|(&hour, _)| hour)
        .collect()
}

/// Split values at the 1/3 and 2/3 quantiles into Low/Medium/High groups.
/// Empty groups are left out.
pub fn tertile_clusters(values: &[f64], metric: Metric) -> BTreeMap<u8, DemandCluster> {
    let mut sorted = values.to_vec();
    sort_values(&mut sorted);
    let (Some(q1), Some(q2)) = (
        quantile_sorted(&sorted, 1.0 / 3.0),
        quantile_sorted(&sorted, 2.0 / 3.0),
    ) else {
        return BTreeMap::new();
    };

    let mut groups: [Vec<f64>; 3] = Default::default();
    for &value in values {
        let id = if value <= q1 {
            0
        } else if value <= q2 {
            1
        } else {
            2
        };
        groups[id].push(value);
    }

    groups
        .iter()
        .enumerate()
        .filter_map(|(id, members)| {
            mean(members).map(|m| {
                (
                    id as u8,
                    DemandCluster {
                        label: CLUSTER_LABELS[id].to_string(),
                        count: members.len(),
                        mean: m,
                        metric,
                    },
                )
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "time_patterns_tests.rs"]
mod time_patterns_tests;
