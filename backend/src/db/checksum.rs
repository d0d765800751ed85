//! Content fingerprints for telemetry snapshots.

use sha2::{Digest, Sha256};

use crate::api::TelemetryRecord;

/// Fingerprint of a record set.
///
/// Each record is hashed through its JSON form, in order, so two sets
/// fingerprint equal only when they hold the same records in the same order.
pub fn fingerprint(records: &[TelemetryRecord]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((records.len() as u64).to_le_bytes());
    for record in records {
        // TelemetryRecord serialization is infallible
        let bytes = serde_json::to_vec(record).unwrap_or_default();
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }
    hex::encode(hasher.finalize())
}
