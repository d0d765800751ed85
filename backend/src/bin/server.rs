//! Cellnet analytics HTTP server binary.
//!
//! Loads configuration and a telemetry snapshot, sets up the HTTP router,
//! and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! TELEMETRY_SNAPSHOT=data/telemetry.json cargo run --bin cellnet-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `TELEMETRY_SNAPSHOT`: JSON snapshot path (default: data/telemetry.json)
//! - `DEMAND_TOP_N`: High-demand slice size (default: 5)
//! - `CACHE_CAPACITY`: Cached analysis results (default: 256)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use cellnet_analytics::db::{AppConfig, LocalRepository, RepositoryError, TelemetryRepository};
use cellnet_analytics::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting cellnet analytics server");

    let config = AppConfig::load()?;

    let repository = match LocalRepository::load_snapshot(&config.data.snapshot_path) {
        Ok(repo) => repo,
        Err(RepositoryError::NotFound { .. }) => {
            warn!(
                "Snapshot {} not found, serving an empty data set",
                config.data.snapshot_path.display()
            );
            LocalRepository::new()
        }
        Err(e) => return Err(e.into()),
    };
    info!("Repository ready with {} records", repository.len());

    let addr: SocketAddr = config.bind_address().parse()?;
    let repository = Arc::new(repository) as Arc<dyn TelemetryRepository>;
    let app = create_router(AppState::new(repository, config));

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
