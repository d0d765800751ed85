//! Network-type usage aggregation.
//!
//! Distributions are always computed from raw record counts. Combining
//! several localities means merging their [`UsageCounts`] and deriving a
//! fresh distribution; percentages are never averaged.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::api::{
    LocalityUsageBreakdown, TelemetryRecord, UsageAnalysis, UsageDistribution, UsageShare,
    UsageTrend,
};

/// Raw per-network-type record counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageCounts {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl UsageCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TelemetryRecord>,
    {
        let mut counts = Self::new();
        for record in records {
            counts.add(&record.network_type);
        }
        counts
    }

    pub fn add(&mut self, network_type: &str) {
        *self.counts.entry(network_type.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Add another set of counts into this one.
    pub fn merge(&mut self, other: &UsageCounts) {
        for (network_type, count) in &other.counts {
            *self.counts.entry(network_type.clone()).or_insert(0) += count;
        }
        self.total += other.total;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, network_type: &str) -> usize {
        self.counts.get(network_type).copied().unwrap_or(0)
    }

    pub fn to_distribution(&self) -> UsageDistribution {
        if self.total == 0 {
            return UsageDistribution::default();
        }
        let total = self.total as f64;
        UsageDistribution(
            self.counts
                .iter()
                .map(|(network_type, &count)| {
                    (
                        network_type.clone(),
                        UsageShare {
                            count,
                            percentage: 100.0 * count as f64 / total,
                        },
                    )
                })
                .collect(),
        )
    }
}

/// Usage distribution of a record set. Empty input yields an empty mapping.
pub fn aggregate<'a, I>(records: I) -> UsageDistribution
where
    I: IntoIterator<Item = &'a TelemetryRecord>,
{
    UsageCounts::from_records(records).to_distribution()
}

/// Time bucketing policy for usage trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Hourly,
    Daily,
}

impl Bucket {
    fn start_of(&self, at: NaiveDateTime) -> NaiveDateTime {
        let midnight = at.date().and_time(NaiveTime::MIN);
        match self {
            Bucket::Daily => midnight,
            Bucket::Hourly => midnight + Duration::hours(at.hour() as i64),
        }
    }

    fn step(&self) -> Duration {
        match self {
            Bucket::Daily => Duration::days(1),
            Bucket::Hourly => Duration::hours(1),
        }
    }

    fn label(&self, start: NaiveDateTime) -> String {
        match self {
            Bucket::Daily => start.format("%Y-%m-%d").to_string(),
            Bucket::Hourly => start.format("%Y-%m-%dT%H:00").to_string(),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Hourly => f.write_str("hourly"),
            Bucket::Daily => f.write_str("daily"),
        }
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Bucket::Daily),
            "hourly" | "hour" => Ok(Bucket::Hourly),
            other => Err(format!("Unsupported bucket '{}'. Use daily or hourly.", other)),
        }
    }
}

/// Per-bucket counts for every network type.
///
/// Buckets run contiguously from the first to the last observation; a
/// bucket with no records of a given type is reported as 0.
pub fn usage_trends(records: &[&TelemetryRecord], bucket: Bucket) -> Vec<UsageTrend> {
    let mut per_type: BTreeMap<&str, BTreeMap<NaiveDateTime, usize>> = BTreeMap::new();
    let mut first: Option<NaiveDateTime> = None;
    let mut last: Option<NaiveDateTime> = None;

    for record in records {
        let start = bucket.start_of(record.timestamp.naive_utc());
        first = Some(first.map_or(start, |f| f.min(start)));
        last = Some(last.map_or(start, |l| l.max(start)));
        *per_type
            .entry(record.network_type.as_str())
            .or_default()
            .entry(start)
            .or_insert(0) += 1;
    }

    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        buckets.push(cursor);
        cursor += bucket.step();
    }
    let dates: Vec<String> = buckets.iter().map(|b| bucket.label(*b)).collect();

    per_type
        .into_iter()
        .map(|(network_type, by_bucket)| UsageTrend {
            network_type: network_type.to_string(),
            dates: dates.clone(),
            counts: buckets
                .iter()
                .map(|b| by_bucket.get(b).copied().unwrap_or(0))
                .collect(),
        })
        .collect()
}

/// Full usage analysis of one record set.
pub fn analyze_usage(
    records: &[&TelemetryRecord],
    locality: Option<&str>,
    bucket: Option<Bucket>,
) -> UsageAnalysis {
    let counts = UsageCounts::from_records(records.iter().copied());
    let usage_stats = counts.to_distribution();
    let dominant_network = usage_stats.dominant().map(str::to_string);
    let trends = bucket
        .map(|b| usage_trends(records, b))
        .unwrap_or_default();

    UsageAnalysis {
        locality: locality.map(str::to_string),
        usage_stats,
        dominant_network,
        total_records: counts.total(),
        trends,
    }
}

/// Aggregate each locality partition on its own worker and combine the
/// results at the count level.
///
/// Entries come back in the order of `partitions`, whatever order the
/// workers finish in. A locality listed more than once keeps only its first
/// partition, so every record is counted once in the combined distribution.
pub async fn aggregate_by_locality(
    partitions: Vec<(String, Vec<TelemetryRecord>)>,
) -> anyhow::Result<LocalityUsageBreakdown> {
    let mut seen = HashSet::new();
    let partitions: Vec<_> = partitions
        .into_iter()
        .filter(|(locality, _)| seen.insert(locality.clone()))
        .collect();
    debug!("Aggregating usage over {} locality partitions", partitions.len());

    let tasks = partitions.into_iter().map(|(locality, records)| {
        tokio::task::spawn_blocking(move || {
            let counts = UsageCounts::from_records(&records);
            (locality, counts)
        })
    });
    let results = futures::future::join_all(tasks).await;

    let mut combined = UsageCounts::new();
    let mut localities = Vec::with_capacity(results.len());
    for result in results {
        let (locality, counts) =
            result.map_err(|e| anyhow::anyhow!("Usage worker failed: {}", e))?;
        combined.merge(&counts);
        let usage_stats = counts.to_distribution();
        localities.push(UsageAnalysis {
            dominant_network: usage_stats.dominant().map(str::to_string),
            locality: Some(locality),
            usage_stats,
            total_records: counts.total(),
            trends: Vec::new(),
        });
    }

    let usage_stats = combined.to_distribution();
    Ok(LocalityUsageBreakdown {
        localities,
        combined: UsageAnalysis {
            locality: None,
            dominant_network: usage_stats.dominant().map(str::to_string),
            usage_stats,
            total_records: combined.total(),
            trends: Vec::new(),
        },
    })
}

#[cfg(test)]
#[path = "usage_tests.rs"]
mod usage_tests;
