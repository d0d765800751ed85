//! Telemetry repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{TelemetryFilter, TelemetryRecord};
use crate::services::LocalityRegistry;

/// Records, registry and fingerprint taken from one consistent snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotView {
    pub fingerprint: String,
    pub records: Vec<TelemetryRecord>,
    pub registry: LocalityRegistry,
}

/// Read access to a telemetry snapshot.
///
/// The analytics core never talks to a repository directly; handlers fetch
/// records through this trait and hand plain slices to the services.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across handlers.
#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Check that the repository is usable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Records matching `filter`, in snapshot order.
    async fn fetch_records(&self, filter: &TelemetryFilter)
        -> RepositoryResult<Vec<TelemetryRecord>>;

    /// Known localities and their coordinates.
    async fn localities(&self) -> RepositoryResult<LocalityRegistry>;

    /// Number of records in the snapshot.
    async fn record_count(&self) -> RepositoryResult<usize>;

    /// Content fingerprint of the whole snapshot. Changes whenever any
    /// record changes.
    async fn snapshot_fingerprint(&self) -> RepositoryResult<String>;

    /// Records matching `filter` together with the registry and the
    /// fingerprint of the snapshot they were read from. A concurrent
    /// replacement is seen either entirely or not at all.
    async fn fetch_snapshot(&self, filter: &TelemetryFilter) -> RepositoryResult<SnapshotView>;
}
