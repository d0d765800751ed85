//! In-memory local repository implementation.
//!
//! Holds one telemetry snapshot in memory, loaded from a JSON file or built
//! from records directly. Replacing the snapshot recomputes its fingerprint
//! and locality registry in the same write.

use async_trait::async_trait;
use log::{info, warn};
use parking_lot::RwLock;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::api::{Locality, TelemetryFilter, TelemetryRecord};
use crate::db::checksum::fingerprint;
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, SnapshotView, TelemetryRepository,
};
use crate::services::LocalityRegistry;

/// On-disk snapshot layout.
///
/// Either a bare array of records, or an object with the records and an
/// optional explicit locality list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Records(Vec<TelemetryRecord>),
    Full {
        #[serde(default)]
        localities: Vec<Locality>,
        records: Vec<TelemetryRecord>,
    },
}

/// In-memory local repository.
///
/// # Example
/// ```
/// use cellnet_analytics::db::LocalRepository;
/// use cellnet_analytics::api::TelemetryRecord;
/// use chrono::Utc;
///
/// let repo = LocalRepository::from_records(vec![
///     TelemetryRecord::new("Patna", "4G", Utc::now()).with_throughput(12.0),
/// ]);
/// assert_eq!(repo.len(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    records: Vec<TelemetryRecord>,
    registry: LocalityRegistry,
    fingerprint: String,
    is_healthy: bool,
}

impl LocalData {
    fn build(records: Vec<TelemetryRecord>, localities: Vec<Locality>) -> Self {
        let mut registry = LocalityRegistry::new(localities);
        for derived in LocalityRegistry::from_records(&records).localities() {
            if registry.get(&derived.name).is_none() {
                registry.insert(derived.clone());
            }
        }
        Self {
            fingerprint: fingerprint(&records),
            records,
            registry,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn from_records(records: Vec<TelemetryRecord>) -> Self {
        Self::with_localities(records, Vec::new())
    }

    /// Explicit localities keep their coordinates and order; localities seen
    /// only in records are appended with positions derived from them.
    pub fn with_localities(records: Vec<TelemetryRecord>, localities: Vec<Locality>) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::build(records, localities))),
        }
    }

    /// Load a JSON snapshot from disk.
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let repo = Self::new();
        repo.reload_from(path)?;
        Ok(repo)
    }

    /// Replace the held snapshot with the content of `path`.
    pub fn reload_from<P: AsRef<Path>>(&self, path: P) -> RepositoryResult<usize> {
        let path = path.as_ref();
        let context = || {
            ErrorContext::new("load_snapshot")
                .with_entity("snapshot")
                .with_entity_id(path.display())
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| RepositoryError::from(e).with_context(context()))?;
        let parsed: SnapshotFile = serde_json::from_str(&content)
            .map_err(|e| RepositoryError::from(e).with_context(context()))?;

        let (records, localities) = match parsed {
            SnapshotFile::Records(records) => (records, Vec::new()),
            SnapshotFile::Full {
                localities,
                records,
            } => (records, localities),
        };

        let count = records.len();
        if count == 0 {
            warn!("Snapshot {} contains no records", path.display());
        }
        self.replace(records, localities);
        info!("Loaded {} telemetry records from {}", count, path.display());
        Ok(count)
    }

    /// Swap in a new snapshot.
    pub fn replace(&self, records: Vec<TelemetryRecord>, localities: Vec<Locality>) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData::build(records, localities);
        data.is_healthy = is_healthy;
    }

    /// Set the health status for testing failure paths.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    pub fn len(&self) -> usize {
        self.data.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().records.is_empty()
    }

    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::internal_with_context(
                "Repository is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetryRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_records(
        &self,
        filter: &TelemetryFilter,
    ) -> RepositoryResult<Vec<TelemetryRecord>> {
        self.check_health("fetch_records")?;
        let data = self.data.read();
        Ok(filter.apply(&data.records).into_iter().cloned().collect())
    }

    async fn localities(&self) -> RepositoryResult<LocalityRegistry> {
        self.check_health("localities")?;
        Ok(self.data.read().registry.clone())
    }

    async fn record_count(&self) -> RepositoryResult<usize> {
        self.check_health("record_count")?;
        Ok(self.len())
    }

    async fn snapshot_fingerprint(&self) -> RepositoryResult<String> {
        self.check_health("snapshot_fingerprint")?;
        Ok(self.data.read().fingerprint.clone())
    }

    async fn fetch_snapshot(&self, filter: &TelemetryFilter) -> RepositoryResult<SnapshotView> {
        let data = self.data.read();
        if !data.is_healthy {
            return Err(RepositoryError::internal_with_context(
                "Repository is not healthy",
                ErrorContext::new("fetch_snapshot"),
            ));
        }
        Ok(SnapshotView {
            fingerprint: data.fingerprint.clone(),
            records: filter.apply(&data.records).into_iter().cloned().collect(),
            registry: data.registry.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Coordinates;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    fn sample() -> Vec<TelemetryRecord> {
        let t0 = Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();
        vec![
            TelemetryRecord::new("Patna", "4G", t0)
                .with_throughput(20.0)
                .with_position(25.6, 85.1),
            TelemetryRecord::new("Gaya", "5G", t0).with_throughput(40.0),
        ]
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        assert!(matches!(
            repo.fetch_records(&TelemetryFilter::all()).await,
            Err(RepositoryError::InternalError { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_filters_by_locality() {
        let repo = LocalRepository::from_records(sample());
        let records = repo
            .fetch_records(&TelemetryFilter::for_locality("Gaya"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].network_type, "5G");

        let none = repo
            .fetch_records(&TelemetryFilter::for_locality("Nowhere"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_explicit_localities_take_precedence() {
        let repo = LocalRepository::with_localities(
            sample(),
            vec![Locality {
                name: "Gaya".to_string(),
                coordinates: Coordinates::new(24.79, 85.0),
            }],
        );
        let registry = repo.localities().await.unwrap();
        let names: Vec<_> = registry.localities().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Gaya", "Patna"]);
        assert_eq!(registry.coordinates_of("Gaya"), Coordinates::new(24.79, 85.0));
        assert_eq!(registry.coordinates_of("Patna"), Coordinates::new(25.6, 85.1));
    }

    #[tokio::test]
    async fn test_replace_changes_fingerprint() {
        let repo = LocalRepository::from_records(sample());
        let before = repo.snapshot_fingerprint().await.unwrap();

        let mut changed = sample();
        changed[1].throughput_mbps = Some(41.0);
        repo.replace(changed, Vec::new());

        let after = repo.snapshot_fingerprint().await.unwrap();
        assert_ne!(before, after);
        assert_eq!(repo.record_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_view_matches_its_records() {
        let repo = LocalRepository::from_records(sample());
        let view = repo
            .fetch_snapshot(&TelemetryFilter::for_locality("Patna"))
            .await
            .unwrap();
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.registry.len(), 2);
        assert_eq!(view.fingerprint, repo.snapshot_fingerprint().await.unwrap());

        repo.set_healthy(false);
        assert!(repo.fetch_snapshot(&TelemetryFilter::all()).await.is_err());
    }

    #[test]
    fn test_load_snapshot_formats() {
        let mut bare = tempfile::NamedTempFile::new().unwrap();
        write!(bare, "{}", serde_json::to_string(&sample()).unwrap()).unwrap();
        assert_eq!(LocalRepository::load_snapshot(bare.path()).unwrap().len(), 2);

        let mut full = tempfile::NamedTempFile::new().unwrap();
        let body = serde_json::json!({
            "localities": [{"name": "Saran", "coordinates": {"latitude": 25.9, "longitude": 84.8}}],
            "records": sample(),
        });
        write!(full, "{}", body).unwrap();
        assert_eq!(LocalRepository::load_snapshot(full.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_load_snapshot_errors() {
        let missing = LocalRepository::load_snapshot("/definitely/not/here.json");
        assert!(matches!(missing, Err(RepositoryError::NotFound { .. })));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "{{\"records\": 12}}").unwrap();
        let err = LocalRepository::load_snapshot(bad.path()).err().unwrap();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert_eq!(err.context().operation.as_deref(), Some("load_snapshot"));
        assert!(err.context().details.is_some());
    }
}
