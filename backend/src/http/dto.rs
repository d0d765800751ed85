//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies are the analysis types from [`crate::api`]; this module
//! only adds query parameter structs and the health response.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::api::TelemetryFilter;

/// Query parameters for the network usage endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkUsageQuery {
    #[serde(default)]
    pub locality: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (start of day, inclusive)
    #[serde(default)]
    pub start_date: Option<String>,
    /// RFC 3339 timestamp (inclusive) or `YYYY-MM-DD` (whole day included)
    #[serde(default)]
    pub end_date: Option<String>,
    /// `daily` or `hourly`; omitted means no trend series
    #[serde(default)]
    pub bucket: Option<String>,
}

/// Query parameters for the per-locality usage endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalityUsageQuery {
    /// Comma-separated locality names; output follows this order.
    /// Omitted means every registered locality in registry order.
    #[serde(default)]
    pub localities: Option<String>,
}

impl LocalityUsageQuery {
    /// Requested names in first-seen order, without blanks or repeats.
    pub fn requested(&self) -> Option<Vec<String>> {
        self.localities.as_ref().map(|list| {
            let mut seen = HashSet::new();
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty() && seen.insert(*name))
                .map(str::to_string)
                .collect()
        })
    }
}

/// Query parameters for the time patterns endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimePatternsQuery {
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default = "default_pattern_metric")]
    pub metric: String,
}

fn default_pattern_metric() -> String {
    "throughput".to_string()
}

/// Query parameters for the location demand endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDemandQuery {
    #[serde(default = "default_demand_metric")]
    pub metric: String,
    #[serde(default = "default_time_range")]
    pub time_range: String,
}

fn default_demand_metric() -> String {
    "composite".to_string()
}

fn default_time_range() -> String {
    "current".to_string()
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Repository status
    pub repository: String,
    pub records_loaded: usize,
}

/// Which end of a day a bare date resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    Start,
    End,
}

/// A parsed date parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateParam {
    /// Explicit timestamp, used as an inclusive bound.
    At(DateTime<Utc>),
    /// Bare end date: the first instant of the next UTC day, exclusive.
    Before(DateTime<Utc>),
}

impl DateParam {
    /// Apply as the upper bound of `filter`.
    pub fn bound_end(self, mut filter: TelemetryFilter) -> TelemetryFilter {
        match self {
            DateParam::At(ts) => filter.end = Some(ts),
            DateParam::Before(ts) => filter.before = Some(ts),
        }
        filter
    }

    pub fn instant(self) -> DateTime<Utc> {
        match self {
            DateParam::At(ts) | DateParam::Before(ts) => ts,
        }
    }
}

/// Parse an RFC 3339 timestamp, or a `YYYY-MM-DD` date. A bare start date
/// begins at midnight UTC; a bare end date covers the whole day.
pub fn parse_date_param(value: &str, bound: DayBound) -> Result<DateParam, String> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(DateParam::At(ts.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD or RFC 3339.", value))?;
    match bound {
        DayBound::Start => Ok(DateParam::At(date.and_time(NaiveTime::MIN).and_utc())),
        DayBound::End => date
            .succ_opt()
            .map(|next| DateParam::Before(next.and_time(NaiveTime::MIN).and_utc()))
            .ok_or_else(|| format!("Date '{}' is out of range", value)),
    }
}
