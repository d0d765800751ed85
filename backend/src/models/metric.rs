use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::telemetry::TelemetryRecord;
use crate::error::AnalyticsError;

/// Numeric metric carried by a telemetry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Data throughput in Mbps
    Throughput,
    /// Signal strength in dBm
    SignalStrength,
    /// Latency in ms
    Latency,
}

impl Metric {
    /// All metrics in canonical order.
    pub const ALL: [Metric; 3] = [Metric::Throughput, Metric::SignalStrength, Metric::Latency];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Throughput => "throughput",
            Metric::SignalStrength => "signal_strength",
            Metric::Latency => "latency",
        }
    }

    /// Whether a lower reading means better service.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Metric::Latency)
    }

    /// Read this metric from a record.
    pub fn read(&self, record: &TelemetryRecord) -> Option<f64> {
        match self {
            Metric::Throughput => record.throughput_mbps,
            Metric::SignalStrength => record.signal_strength,
            Metric::Latency => record.latency_ms,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "throughput" | "throughput_mbps" | "data_throughput" => Ok(Metric::Throughput),
            "signal_strength" | "signal" => Ok(Metric::SignalStrength),
            "latency" | "latency_ms" => Ok(Metric::Latency),
            _ => Err(AnalyticsError::UnknownMetric(s.to_string())),
        }
    }
}

/// Resolve a metric by name on a single record.
///
/// Values are returned in their canonical unit (Mbps, dBm, ms) with no
/// conversion. An unrecognised name is an error; a missing reading is `None`.
pub fn resolve(record: &TelemetryRecord, metric_name: &str) -> Result<Option<f64>, AnalyticsError> {
    let metric: Metric = metric_name.parse()?;
    Ok(metric.read(record))
}

/// Metric selection for demand ranking.
///
/// Serialized as its selector name (`"composite"`, `"latency"`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DemandSelector {
    /// Sum of min-max normalised metrics
    #[default]
    Composite,
    /// A single metric's locality mean
    Single(Metric),
}

impl DemandSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandSelector::Composite => "composite",
            DemandSelector::Single(metric) => metric.as_str(),
        }
    }

    /// Metrics the selector needs from each locality summary.
    pub fn metrics(&self) -> Vec<Metric> {
        match self {
            DemandSelector::Composite => Metric::ALL.to_vec(),
            DemandSelector::Single(metric) => vec![*metric],
        }
    }
}

impl fmt::Display for DemandSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemandSelector {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "composite" => Ok(DemandSelector::Composite),
            "throughput" => Ok(DemandSelector::Single(Metric::Throughput)),
            "signal_strength" => Ok(DemandSelector::Single(Metric::SignalStrength)),
            "latency" => Ok(DemandSelector::Single(Metric::Latency)),
            _ => Err(AnalyticsError::InvalidSelector(s.to_string())),
        }
    }
}

impl From<DemandSelector> for String {
    fn from(selector: DemandSelector) -> Self {
        selector.as_str().to_string()
    }
}

impl TryFrom<String> for DemandSelector {
    type Error = AnalyticsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record() -> TelemetryRecord {
        TelemetryRecord::new("Patna", "4G", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .with_throughput(12.5)
            .with_signal_strength(-81.0)
    }

    #[test]
    fn test_resolve_known_metrics() {
        let r = record();
        assert_eq!(resolve(&r, "throughput").unwrap(), Some(12.5));
        assert_eq!(resolve(&r, "signal_strength").unwrap(), Some(-81.0));
        assert_eq!(resolve(&r, "latency").unwrap(), None);
    }

    #[test]
    fn test_resolve_unknown_metric_fails() {
        let err = resolve(&record(), "jitter").unwrap_err();
        assert_eq!(err, AnalyticsError::UnknownMetric("jitter".to_string()));
    }

    #[test]
    fn test_metric_aliases() {
        assert_eq!("Data_Throughput".parse::<Metric>().unwrap(), Metric::Throughput);
        assert_eq!("latency_ms".parse::<Metric>().unwrap(), Metric::Latency);
        assert_eq!(" signal ".parse::<Metric>().unwrap(), Metric::SignalStrength);
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(
            "composite".parse::<DemandSelector>().unwrap(),
            DemandSelector::Composite
        );
        assert_eq!(
            "latency".parse::<DemandSelector>().unwrap(),
            DemandSelector::Single(Metric::Latency)
        );
        assert!(matches!(
            "weighted".parse::<DemandSelector>(),
            Err(AnalyticsError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_selector_serializes_as_name() {
        let json = serde_json::to_string(&DemandSelector::Single(Metric::SignalStrength)).unwrap();
        assert_eq!(json, "\"signal_strength\"");
        let back: DemandSelector = serde_json::from_str("\"composite\"").unwrap();
        assert_eq!(back, DemandSelector::Composite);
    }

    #[test]
    fn test_selector_metrics() {
        assert_eq!(DemandSelector::Composite.metrics().len(), 3);
        assert_eq!(
            DemandSelector::Single(Metric::Throughput).metrics(),
            vec![Metric::Throughput]
        );
    }
}
