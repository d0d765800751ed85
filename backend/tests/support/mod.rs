#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Mutex;

use cellnet_analytics::api::TelemetryRecord;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Monday 2024-06-03 00:00 UTC.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()
}

/// Three localities with clearly separated demand profiles:
/// A (throughput 50, signal -60), C (30, -80), B (10, -95).
///
/// Each locality gets `per_locality` hourly records with a fixed position.
pub fn three_locality_fixture(per_locality: usize) -> Vec<TelemetryRecord> {
    let profiles = [
        ("A", 50.0, -60.0, 25.60, 85.10),
        ("B", 10.0, -95.0, 24.80, 85.00),
        ("C", 30.0, -80.0, 25.90, 84.80),
    ];
    let mut records = Vec::new();
    for (name, throughput, signal, lat, lon) in profiles {
        for i in 0..per_locality {
            let network = if i % 3 == 0 { "5G" } else { "4G" };
            records.push(
                TelemetryRecord::new(name, network, base_time() + Duration::hours(i as i64))
                    .with_throughput(throughput)
                    .with_signal_strength(signal)
                    .with_latency(40.0)
                    .with_position(lat, lon),
            );
        }
    }
    records
}

/// Fixed 20-record fixture for one locality: 9 × 4G, 7 × 5G, 4 × 3G,
/// spread across hours and days.
pub fn twenty_record_fixture() -> Vec<TelemetryRecord> {
    let types = [
        "4G", "5G", "4G", "3G", "5G", "4G", "4G", "5G", "3G", "4G", //
        "5G", "4G", "3G", "5G", "4G", "5G", "4G", "3G", "5G", "4G",
    ];
    types
        .iter()
        .enumerate()
        .map(|(i, network)| {
            TelemetryRecord::new(
                "Patna",
                *network,
                base_time() + Duration::hours(i as i64 * 7),
            )
            .with_throughput(10.0 + i as f64)
        })
        .collect()
}
