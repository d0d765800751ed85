//! Telemetry data access.
//!
//! This module provides the Repository pattern between the HTTP layer and
//! wherever a telemetry snapshot comes from.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (http::handlers)                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │ TelemetryFilter
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository::TelemetryRepository)     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │      (in-memory, JSON snapshot file)          │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! Records come out of the repository as plain values; the analytic
//! services in [`crate::services`] never see the repository.
//!
//! # Usage
//! ```no_run
//! use cellnet_analytics::db::{AppConfig, LocalRepository, TelemetryRepository};
//! use cellnet_analytics::api::TelemetryFilter;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let repo = LocalRepository::load_snapshot(&config.data.snapshot_path)?;
//!     let records = repo.fetch_records(&TelemetryFilter::for_locality("Patna")).await?;
//!     println!("{} records", records.len());
//!     Ok(())
//! }
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod config;
pub mod repositories;
pub mod repository;

pub use checksum::fingerprint;
pub use config::AppConfig;
pub use repositories::LocalRepository;
pub use repository::{
    ErrorContext, RepositoryError, RepositoryResult, SnapshotView, TelemetryRepository,
};
