use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::{Locality, Metric, MetricSummary};

/// Registered localities with their coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalityList {
    pub localities: Vec<Locality>,
    pub total: usize,
}

/// Distinct network types seen in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkTypeList {
    pub network_types: Vec<String>,
    pub total: usize,
}

/// First and last record timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Overall snapshot statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub total_records: usize,
    pub localities: usize,
    pub network_types: usize,
    pub date_range: DateRange,
    /// Keyed by metric name at the top level of the JSON object
    #[serde(flatten)]
    pub metrics: BTreeMap<Metric, MetricSummary>,
}

pub const LIST_LOCALITIES: &str = "list_localities";
pub const LIST_NETWORK_TYPES: &str = "list_network_types";
pub const GET_DATA_SUMMARY: &str = "get_data_summary";
