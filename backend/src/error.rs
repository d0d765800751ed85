//! Error types for the analytics core.
//!
//! Only malformed requests are errors. Empty record sets, single-locality
//! inputs and metrics with no observations all produce well-defined empty
//! results instead.

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors raised by the analytics core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyticsError {
    /// Metric name outside `throughput`, `signal_strength`, `latency`.
    #[error("Unknown metric '{0}'. Expected one of: throughput, signal_strength, latency")]
    UnknownMetric(String),

    /// Demand selector outside `composite`, `throughput`, `signal_strength`, `latency`.
    #[error(
        "Invalid demand selector '{0}'. Expected one of: composite, throughput, signal_strength, latency"
    )]
    InvalidSelector(String),
}

impl AnalyticsError {
    /// Stable machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            AnalyticsError::UnknownMetric(_) => "UNKNOWN_METRIC",
            AnalyticsError::InvalidSelector(_) => "INVALID_SELECTOR",
        }
    }
}
