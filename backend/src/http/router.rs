//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Snapshot metadata
        .route("/localities", get(handlers::list_localities))
        .route("/network-types", get(handlers::list_network_types))
        .route("/data/summary", get(handlers::get_data_summary))
        // Analysis
        .route("/analysis/network-usage", get(handlers::get_network_usage))
        .route(
            "/analysis/network-usage/localities",
            get(handlers::get_locality_usage),
        )
        .route("/analysis/time-patterns", get(handlers::get_time_patterns))
        .route("/analysis/location-demand", get(handlers::get_location_demand));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
