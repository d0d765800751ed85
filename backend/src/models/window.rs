use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::telemetry::TelemetryRecord;

/// Selection applied to a telemetry snapshot before analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFilter {
    /// Restrict to a single locality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    /// Inclusive lower bound on the record timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the record timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the record timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<DateTime<Utc>>,
}

impl TelemetryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_locality(locality: impl Into<String>) -> Self {
        Self {
            locality: Some(locality.into()),
            ..Default::default()
        }
    }

    pub fn between(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn matches(&self, record: &TelemetryRecord) -> bool {
        if let Some(ref locality) = self.locality {
            if &record.locality != locality {
                return false;
            }
        }
        if let Some(start) = self.start {
            if record.timestamp < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if record.timestamp > end {
                return false;
            }
        }
        if let Some(before) = self.before {
            if record.timestamp >= before {
                return false;
            }
        }
        true
    }

    /// Borrow the records accepted by this filter, preserving input order.
    pub fn apply<'a>(&self, records: &'a [TelemetryRecord]) -> Vec<&'a TelemetryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Trailing window used by the location demand view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Entire snapshot
    #[default]
    Current,
    /// Last 7 days of the snapshot
    Week,
    /// Last 30 days of the snapshot
    Month,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Current => "current",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
        }
    }

    fn span(&self) -> Option<Duration> {
        match self {
            TimeRange::Current => None,
            TimeRange::Week => Some(Duration::days(7)),
            TimeRange::Month => Some(Duration::days(30)),
        }
    }

    /// Keep the records inside the window that ends at the newest timestamp
    /// of `records`. The window is anchored on the data, not the wall clock.
    pub fn select<'a>(&self, records: &'a [TelemetryRecord]) -> Vec<&'a TelemetryRecord> {
        let Some(span) = self.span() else {
            return records.iter().collect();
        };
        let Some(latest) = records.iter().map(|r| r.timestamp).max() else {
            return Vec::new();
        };
        let cutoff = latest - span;
        records.iter().filter(|r| r.timestamp > cutoff).collect()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "current" | "all" => Ok(TimeRange::Current),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            other => Err(format!(
                "Unsupported time range '{}'. Use current, week, or month.",
                other
            )),
        }
    }
}
