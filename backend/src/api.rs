//! Public API surface for the analytics backend.
//!
//! This file consolidates the DTO types for the HTTP API and the in-process
//! callers. All types derive `Serialize` for JSON output; the core itself is
//! indifferent to the wire format.

pub use crate::routes::demand::DemandMarker;
pub use crate::routes::demand::DemandRanking;
pub use crate::routes::demand::DemandScore;
pub use crate::routes::demand::DemandTier;
pub use crate::routes::demand::LocalitySummary;
pub use crate::routes::demand::LocationDemand;
pub use crate::routes::demand::MetricSummary;
pub use crate::routes::demand::ScoreStatistics;
pub use crate::routes::landing::DataSummary;
pub use crate::routes::landing::DateRange;
pub use crate::routes::landing::LocalityList;
pub use crate::routes::landing::NetworkTypeList;
pub use crate::routes::patterns::DemandCluster;
pub use crate::routes::patterns::HeatmapCell;
pub use crate::routes::patterns::TimePattern;
pub use crate::routes::usage::LocalityUsageBreakdown;
pub use crate::routes::usage::UsageAnalysis;
pub use crate::routes::usage::UsageDistribution;
pub use crate::routes::usage::UsageShare;
pub use crate::routes::usage::UsageTrend;

pub use crate::error::{AnalyticsError, AnalyticsResult};
pub use crate::models::{
    Coordinates, DemandSelector, Locality, Metric, TelemetryFilter, TelemetryRecord, TimeRange,
};
