use std::collections::{BTreeMap, BTreeSet};

use super::stats::compute_stats;
use crate::api::{DataSummary, DateRange, Metric, NetworkTypeList, TelemetryRecord};

/// Snapshot-wide counts, date range and per-metric statistics.
pub fn data_summary(records: &[TelemetryRecord]) -> DataSummary {
    let localities: BTreeSet<&str> = records.iter().map(|r| r.locality.as_str()).collect();
    let network_types: BTreeSet<&str> = records.iter().map(|r| r.network_type.as_str()).collect();

    let date_range = DateRange {
        start: records.iter().map(|r| r.timestamp).min(),
        end: records.iter().map(|r| r.timestamp).max(),
    };

    let mut metrics = BTreeMap::new();
    for metric in Metric::ALL {
        let values: Vec<f64> = records.iter().filter_map(|r| metric.read(r)).collect();
        if let Some(stats) = compute_stats(&values) {
            metrics.insert(metric, stats);
        }
    }

    DataSummary {
        total_records: records.len(),
        localities: localities.len(),
        network_types: network_types.len(),
        date_range,
        metrics,
    }
}

/// Distinct network types, sorted.
pub fn network_types(records: &[TelemetryRecord]) -> NetworkTypeList {
    let network_types: Vec<String> = records
        .iter()
        .map(|r| r.network_type.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    NetworkTypeList {
        total: network_types.len(),
        network_types,
    }
}
