//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint. Handlers fetch records from
//! the repository and hand them to the pure services in [`crate::services`];
//! CPU-bound analysis runs on the blocking pool.

use axum::{
    extract::{Query, State},
    Json,
};

use super::cache::CacheKey;
use super::dto::{
    parse_date_param, DateParam, DayBound, HealthResponse, LocalityUsageQuery,
    LocationDemandQuery, NetworkUsageQuery, TimePatternsQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    DataSummary, DemandSelector, LocalityList, LocalityUsageBreakdown, LocationDemand, Metric,
    NetworkTypeList, TelemetryFilter, TimePattern, TimeRange, UsageAnalysis,
};
use crate::services::{self, Bucket};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Run CPU-bound analysis off the async executor.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the snapshot
/// is readable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repository = match state.repository.health_check().await {
        Ok(true) => "ready".to_string(),
        Ok(false) => "unavailable".to_string(),
        Err(e) => format!("error: {}", e),
    };
    let records_loaded = state.repository.record_count().await.unwrap_or(0);

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository,
        records_loaded,
    }))
}

// =============================================================================
// Snapshot metadata
// =============================================================================

/// GET /v1/localities
pub async fn list_localities(State(state): State<AppState>) -> HandlerResult<LocalityList> {
    let registry = state.repository.localities().await?;
    let localities = registry.localities().to_vec();

    Ok(Json(LocalityList {
        total: localities.len(),
        localities,
    }))
}

/// GET /v1/network-types
pub async fn list_network_types(State(state): State<AppState>) -> HandlerResult<NetworkTypeList> {
    let records = state.repository.fetch_records(&TelemetryFilter::all()).await?;
    Ok(Json(services::network_types(&records)))
}

/// GET /v1/data/summary
pub async fn get_data_summary(State(state): State<AppState>) -> HandlerResult<DataSummary> {
    let records = state.repository.fetch_records(&TelemetryFilter::all()).await?;
    let summary = run_blocking(move || services::data_summary(&records)).await?;
    Ok(Json(summary))
}

// =============================================================================
// Analysis endpoints
// =============================================================================

/// GET /v1/analysis/network-usage
///
/// Network-type distribution for one locality (or all of them) inside an
/// optional date window, with an optional trend series.
pub async fn get_network_usage(
    State(state): State<AppState>,
    Query(query): Query<NetworkUsageQuery>,
) -> HandlerResult<UsageAnalysis> {
    let start = query
        .start_date
        .as_deref()
        .map(|s| parse_date_param(s, DayBound::Start))
        .transpose()
        .map_err(AppError::BadRequest)?;
    let end = query
        .end_date
        .as_deref()
        .map(|s| parse_date_param(s, DayBound::End))
        .transpose()
        .map_err(AppError::BadRequest)?;
    let bucket: Option<Bucket> = query
        .bucket
        .as_deref()
        .map(|s| s.parse::<Bucket>())
        .transpose()
        .map_err(AppError::BadRequest)?;

    let filter = TelemetryFilter {
        locality: query.locality.clone(),
        ..TelemetryFilter::all()
    }
    .between(start.map(DateParam::instant), None);
    let filter = match end {
        Some(end) => end.bound_end(filter),
        None => filter,
    };
    let records = state.repository.fetch_records(&filter).await?;

    let locality = query.locality;
    let analysis = run_blocking(move || {
        let refs: Vec<_> = records.iter().collect();
        services::analyze_usage(&refs, locality.as_deref(), bucket)
    })
    .await?;

    Ok(Json(analysis))
}

/// GET /v1/analysis/network-usage/localities
///
/// Per-locality distributions plus a combined distribution merged from raw
/// counts. Entries follow the requested order.
pub async fn get_locality_usage(
    State(state): State<AppState>,
    Query(query): Query<LocalityUsageQuery>,
) -> HandlerResult<LocalityUsageBreakdown> {
    let names = match query.requested() {
        Some(names) => names,
        None => state
            .repository
            .localities()
            .await?
            .localities()
            .iter()
            .map(|l| l.name.clone())
            .collect(),
    };

    let mut partitions = Vec::with_capacity(names.len());
    for name in names {
        let records = state
            .repository
            .fetch_records(&TelemetryFilter::for_locality(name.clone()))
            .await?;
        partitions.push((name, records));
    }

    let breakdown = services::aggregate_by_locality(partitions).await?;
    Ok(Json(breakdown))
}

/// GET /v1/analysis/time-patterns
pub async fn get_time_patterns(
    State(state): State<AppState>,
    Query(query): Query<TimePatternsQuery>,
) -> HandlerResult<TimePattern> {
    let metric: Metric = query.metric.parse()?;

    let selector = format!(
        "time_patterns:{}:{}",
        query.locality.as_deref().unwrap_or("*"),
        metric
    );
    let current = state.repository.snapshot_fingerprint().await?;
    if let Some(hit) = state.pattern_cache.get(&CacheKey::new(current, selector.as_str())) {
        tracing::debug!(selector = %selector, "Time pattern cache hit");
        return Ok(Json(hit));
    }

    let filter = TelemetryFilter {
        locality: query.locality,
        ..TelemetryFilter::all()
    };
    // Key on the fingerprint the records were read with, not the one checked above
    let snapshot = state.repository.fetch_snapshot(&filter).await?;
    let key = CacheKey::new(snapshot.fingerprint, selector);
    let records = snapshot.records;
    let pattern = run_blocking(move || {
        let refs: Vec<_> = records.iter().collect();
        services::build_time_pattern_for(&refs, metric)
    })
    .await?;

    state.pattern_cache.insert(key, pattern.clone());
    Ok(Json(pattern))
}

/// GET /v1/analysis/location-demand
pub async fn get_location_demand(
    State(state): State<AppState>,
    Query(query): Query<LocationDemandQuery>,
) -> HandlerResult<LocationDemand> {
    let demand_selector: DemandSelector = query.metric.parse()?;
    let time_range: TimeRange = query.time_range.parse().map_err(AppError::BadRequest)?;
    let top_n = state.config.analysis.top_n;
    let scale = state.config.presentation.scale();

    let selector = format!("location_demand:{}:{}:{}", demand_selector, time_range, top_n);
    let current = state.repository.snapshot_fingerprint().await?;
    if let Some(hit) = state.demand_cache.get(&CacheKey::new(current, selector.as_str())) {
        tracing::debug!(selector = %selector, "Location demand cache hit");
        return Ok(Json(hit));
    }

    let snapshot = state.repository.fetch_snapshot(&TelemetryFilter::all()).await?;
    let key = CacheKey::new(snapshot.fingerprint, selector);
    let (records, registry) = (snapshot.records, snapshot.registry);
    let demand = run_blocking(move || {
        services::location_demand(&records, &registry, demand_selector, time_range, top_n, scale)
    })
    .await?;

    state.demand_cache.insert(key, demand.clone());
    Ok(Json(demand))
}
