//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use vitrine_storage::{DatasetStore, StatsCache};

use crate::config::ApiConfig;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Dataset backing both the item routes and the stats cache.
    pub store: Arc<dyn DatasetStore>,
    /// Stats cache over `store`.
    pub cache: Arc<StatsCache>,
    pub config: Arc<ApiConfig>,
    pub start_time: Instant,
}

impl AppState {
    /// Build state with a fresh cache over `store`.
    pub fn new(store: Arc<dyn DatasetStore>, config: ApiConfig) -> Self {
        let cache = Arc::new(StatsCache::new(Arc::clone(&store)));
        Self::with_cache(cache, config)
    }

    /// Build state around an existing cache, sharing its store.
    pub fn with_cache(cache: Arc<StatsCache>, config: ApiConfig) -> Self {
        Self {
            store: Arc::clone(cache.store()),
            cache,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

crate::impl_from_ref!(Arc<dyn DatasetStore>, store);
crate::impl_from_ref!(Arc<StatsCache>, cache);
crate::impl_from_ref!(Arc<ApiConfig>, config);
