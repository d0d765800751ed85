use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::models::Metric;

// =========================================================
// Time pattern types + route
// =========================================================

/// Mean metric value for one (hour, day-of-week) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// 0-23
    pub hour: u32,
    /// 0 = Sunday .. 6 = Saturday
    pub day: u32,
    pub value: f64,
}

/// Quantile-based demand group.
///
/// Serializes its mean under `mean_<metric>`, e.g. `mean_throughput`.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandCluster {
    pub label: String,
    pub count: usize,
    pub mean: f64,
    pub metric: Metric,
}

impl Serialize for DemandCluster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("label", &self.label)?;
        map.serialize_entry("count", &self.count)?;
        map.serialize_entry(&format!("mean_{}", self.metric), &self.mean)?;
        map.end()
    }
}

/// Temporal demand patterns for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePattern {
    pub metric: Metric,
    /// Records that carried a value for `metric`
    pub total_records: usize,
    /// Sparse: hours without data are absent
    pub hourly_averages: BTreeMap<u32, f64>,
    /// Sparse: days without data are absent
    pub daily_patterns: BTreeMap<u32, f64>,
    /// Ordered by hour, then day; only observed pairs
    pub heatmap: Vec<HeatmapCell>,
    /// Ascending
    pub peak_hours: Vec<u32>,
    pub demand_clusters: BTreeMap<u8, DemandCluster>,
}

/// Route function name constant for time patterns
pub const GET_TIME_PATTERNS: &str = "get_time_patterns";
