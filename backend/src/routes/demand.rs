use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Coordinates, DemandSelector, Metric, TimeRange};

// =========================================================
// Location demand types + route
// =========================================================

/// Descriptive statistics of one metric over a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Per-locality metric summaries used as input to the demand ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalitySummary {
    pub locality: String,
    pub coordinates: Coordinates,
    /// Only metrics with at least one observation appear here
    pub metrics: BTreeMap<Metric, MetricSummary>,
}

impl LocalitySummary {
    pub fn new(locality: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            locality: locality.into(),
            coordinates,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, metric: Metric, summary: MetricSummary) -> Self {
        self.metrics.insert(metric, summary);
        self
    }

    pub fn mean(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).map(|s| s.mean)
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// A ranked locality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandScore {
    pub locality: String,
    pub score: f64,
    /// 1-based, 1 = highest demand
    pub rank: usize,
    pub coordinates: Coordinates,
    pub statistics: BTreeMap<Metric, MetricSummary>,
}

/// Distribution of the final demand scores.
///
/// Numeric fields are `None` when no locality was ranked, so an empty
/// result never reads as "zero demand".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub total_localities: usize,
}

/// Output of the demand ranker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandRanking {
    pub ranked: Vec<DemandScore>,
    pub statistics: ScoreStatistics,
    pub top_n: Vec<DemandScore>,
}

/// Visual intensity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DemandTier {
    Low,
    Medium,
    High,
}

/// Map marker derived from a ranked locality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandMarker {
    pub locality: String,
    pub coordinates: Coordinates,
    pub tier: DemandTier,
    pub size: f64,
}

/// Location demand view: ranking plus presentation markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDemand {
    pub metric: DemandSelector,
    pub time_range: TimeRange,
    pub ranked_localities: Vec<DemandScore>,
    pub statistics: ScoreStatistics,
    pub top_5_high_demand: Vec<DemandScore>,
    pub markers: Vec<DemandMarker>,
}

/// Route function name constant for location demand
pub const GET_LOCATION_DEMAND: &str = "get_location_demand";
