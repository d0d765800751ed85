use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =========================================================
// Network usage types + route
// =========================================================

/// Usage share of one network type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageShare {
    pub count: usize,
    /// Share of all input records, in [0, 100]
    pub percentage: f64,
}

/// Network type → usage share, in alphabetical network-type order.
///
/// Always derived from raw counts; there is no way to combine two
/// distributions directly. Merge the underlying counts instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageDistribution(pub(crate) BTreeMap<String, UsageShare>);

impl UsageDistribution {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, network_type: &str) -> Option<&UsageShare> {
        self.0.get(network_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UsageShare)> {
        self.0.iter()
    }

    /// Number of records the distribution was computed from.
    pub fn total_count(&self) -> usize {
        self.0.values().map(|s| s.count).sum()
    }

    /// Sum of all percentages (100 when non-empty, 0 when empty).
    pub fn percentage_sum(&self) -> f64 {
        self.0.values().map(|s| s.percentage).sum()
    }

    /// Network type with the highest share; ties go to the alphabetically
    /// first name.
    pub fn dominant(&self) -> Option<&str> {
        let mut best: Option<(&String, usize)> = None;
        for (name, share) in &self.0 {
            match best {
                Some((_, count)) if share.count <= count => {}
                _ => best = Some((name, share.count)),
            }
        }
        best.map(|(name, _)| name.as_str())
    }
}

/// Per-bucket record counts for one network type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageTrend {
    pub network_type: String,
    /// Bucket labels, ascending
    pub dates: Vec<String>,
    /// One count per bucket, zero where no records fell in the bucket
    pub counts: Vec<usize>,
}

/// Network usage analysis for one locality or the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    pub usage_stats: UsageDistribution,
    pub dominant_network: Option<String>,
    pub total_records: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trends: Vec<UsageTrend>,
}

/// Usage breakdown of every locality plus the record-level combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalityUsageBreakdown {
    /// One entry per locality, in the requested order
    pub localities: Vec<UsageAnalysis>,
    /// Distribution over the union of all locality records
    pub combined: UsageAnalysis,
}

/// Route function name constant for network usage
pub const GET_NETWORK_USAGE: &str = "get_network_usage";
/// Route function name constant for the per-locality breakdown
pub const GET_LOCALITY_USAGE: &str = "get_locality_usage";

#[cfg(test)]
mod tests {
    use super::*;

    fn distribution(entries: &[(&str, usize, f64)]) -> UsageDistribution {
        UsageDistribution(
            entries
                .iter()
                .map(|(name, count, percentage)| {
                    (
                        name.to_string(),
                        UsageShare {
                            count: *count,
                            percentage: *percentage,
                        },
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_dominant_prefers_highest_count() {
        let d = distribution(&[("3G", 2, 20.0), ("4G", 5, 50.0), ("5G", 3, 30.0)]);
        assert_eq!(d.dominant(), Some("4G"));
        assert_eq!(d.total_count(), 10);
    }

    #[test]
    fn test_dominant_tie_breaks_alphabetically() {
        let d = distribution(&[("LTE", 4, 40.0), ("5G", 4, 40.0), ("3G", 2, 20.0)]);
        assert_eq!(d.dominant(), Some("5G"));
    }

    #[test]
    fn test_empty_distribution_serializes_as_empty_object() {
        let d = UsageDistribution::default();
        assert_eq!(d.dominant(), None);
        assert_eq!(serde_json::to_string(&d).unwrap(), "{}");
    }

    #[test]
    fn test_route_constants() {
        assert_eq!(GET_NETWORK_USAGE, "get_network_usage");
        assert_eq!(GET_LOCALITY_USAGE, "get_locality_usage");
    }
}
