use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// One cellular telemetry observation.
///
/// Numeric fields are optional: a missing reading is excluded from every
/// aggregate over that metric, never treated as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub locality: String,
    pub network_type: String,
    pub timestamp: DateTime<Utc>,
    /// Signal strength in dBm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<f64>,
    /// Data throughput in Mbps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_mbps: Option<f64>,
    /// Round-trip latency in ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    /// Measurement latitude, used only to derive locality coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Measurement longitude, used only to derive locality coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl TelemetryRecord {
    /// Create a record with no metric readings attached.
    pub fn new(
        locality: impl Into<String>,
        network_type: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            locality: locality.into(),
            network_type: network_type.into(),
            timestamp,
            signal_strength: None,
            throughput_mbps: None,
            latency_ms: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_signal_strength(mut self, dbm: f64) -> Self {
        self.signal_strength = Some(dbm);
        self
    }

    pub fn with_throughput(mut self, mbps: f64) -> Self {
        self.throughput_mbps = Some(mbps);
        self
    }

    pub fn with_latency(mut self, ms: f64) -> Self {
        self.latency_ms = Some(ms);
        self
    }

    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Hour of day (0-23, UTC).
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Day of week (0 = Sunday .. 6 = Saturday, UTC).
    pub fn weekday(&self) -> u32 {
        self.timestamp.weekday().num_days_from_sunday()
    }
}

/// Geographic position of a locality in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A named locality with fixed coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locality {
    pub name: String,
    pub coordinates: Coordinates,
}
