//! Analytic services.
//!
//! Every function here is a pure computation over telemetry records or
//! locality summaries. Data acquisition lives in [`crate::db`] and result
//! caching in the HTTP layer.

pub mod demand;
pub mod presentation;
pub mod registry;
pub(crate) mod stats;
pub mod summary;
pub mod time_patterns;
pub mod usage;

pub use demand::{location_demand, rank, rank_with_top_n, summarize_localities, DEFAULT_TOP_N};
pub use presentation::{
    cell_tier, demand_markers, heatmap_grid, intensity_size, tier, VisualScale,
};
pub use registry::LocalityRegistry;
pub use summary::{data_summary, network_types};
pub use time_patterns::{build as build_time_pattern, build_for as build_time_pattern_for};
pub use usage::{aggregate, aggregate_by_locality, analyze_usage, usage_trends, Bucket, UsageCounts};
