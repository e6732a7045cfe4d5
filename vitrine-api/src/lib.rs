//! VITRINE API - REST layer for the catalog
//!
//! Exposes item listing/search/creation and the cached dataset statistics
//! over Axum, with health checks, Prometheus metrics, and an OpenAPI
//! document.

pub mod config;
pub mod constants;
pub mod error;
pub mod extractors;
pub mod macros;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use vitrine_storage::{ChangeListener, DatasetWatcher, StatsCache};

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;

/// Arm a watcher that invalidates `cache` when its dataset file changes.
///
/// Returns `None` when the store has no file to watch or the watch could
/// not be set up. Either way the cache still checks modification times on
/// every read.
pub fn start_dataset_watcher(cache: &Arc<StatsCache>) -> Option<DatasetWatcher> {
    let path = cache.store().location()?.to_path_buf();
    let listener: Arc<dyn ChangeListener> = Arc::clone(cache) as Arc<dyn ChangeListener>;

    match DatasetWatcher::watch(&path, listener) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to initialize file watcher, relying on modification time checks"
            );
            None
        }
    }
}
