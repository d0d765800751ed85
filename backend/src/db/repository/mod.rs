//! Repository trait and error types.

pub mod error;
pub mod telemetry;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use telemetry::{SnapshotView, TelemetryRepository};
