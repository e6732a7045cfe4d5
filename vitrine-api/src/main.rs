//! VITRINE API Server Entry Point
//!
//! Loads configuration, opens the dataset, arms the file watcher, and
//! serves the Axum router until Ctrl-C or SIGTERM.

use std::sync::Arc;

use axum::Router;
use vitrine_api::telemetry::{init_tracing, TelemetryConfig};
use vitrine_api::{create_api_router, start_dataset_watcher, ApiConfig, ApiError, ApiResult, AppState};
use vitrine_storage::{DatasetStore, JsonFileStore, StatsCache};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env()?;
    let addr = api_config.bind_addr()?;

    let store: Arc<dyn DatasetStore> = Arc::new(JsonFileStore::new(&api_config.data_path));
    let cache = Arc::new(StatsCache::new(store));

    let watcher = if api_config.watch_enabled {
        start_dataset_watcher(&cache)
    } else {
        tracing::info!("File watcher disabled");
        None
    };

    let state = AppState::with_cache(cache, api_config);
    let app: Router = create_api_router(state, telemetry_config.metrics_enabled);

    tracing::info!(%addr, "Starting VITRINE API server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    drop(watcher);
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
