//! # Cellnet Analytics Backend
//!
//! Demand analytics over cellular network telemetry.
//!
//! The crate turns raw per-record telemetry (signal strength, throughput,
//! latency, network type, timestamp, locality) into the artifacts a
//! dashboard draws: network-type usage distributions, a ranked locality
//! demand score and temporal demand patterns. An axum REST API serves them
//! over a JSON snapshot.
//!
//! ## Features
//!
//! - **Usage**: Network-type shares per locality and combined from raw counts
//! - **Demand**: Composite or single-metric locality ranking with latency inverted
//! - **Time Patterns**: Hourly and weekday averages, hour×day heatmap, peak hours, tertile clusters
//! - **Presentation**: Score to tier and marker size mapping
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`models`]: Telemetry records, metrics, selectors and windows
//! - [`services`]: Pure analytic computations
//! - [`db`]: Repository pattern, snapshot loading and configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Route-specific data types
//!
//! ## Example
//!
//! ```
//! use cellnet_analytics::api::TelemetryRecord;
//! use cellnet_analytics::services::aggregate;
//! use chrono::Utc;
//!
//! let records = vec![
//!     TelemetryRecord::new("Patna", "4G", Utc::now()),
//!     TelemetryRecord::new("Patna", "5G", Utc::now()),
//!     TelemetryRecord::new("Patna", "4G", Utc::now()),
//! ];
//! let usage = aggregate(&records);
//! assert_eq!(usage.dominant(), Some("4G"));
//! ```

// RepositoryError carries structured context
#![allow(clippy::result_large_err)]

pub mod api;
pub mod error;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
