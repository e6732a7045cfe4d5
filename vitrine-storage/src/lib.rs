//! VITRINE Storage - Dataset Access and Stats Cache
//!
//! Defines the dataset store abstraction, the JSON file and in-memory
//! implementations, the single-flight stats cache, and the filesystem
//! watcher that invalidates it.

pub mod cache;
pub mod memory;
pub mod store;
pub mod watcher;

pub use cache::{
    CacheCounters, CacheRead, CacheStats, CacheStatus, InvalidationSource, StatsCache,
};
pub use memory::InMemoryDatasetStore;
pub use store::{DatasetStore, JsonFileStore};
pub use watcher::{is_dataset_change, ChangeListener, DatasetWatcher, WatchError};

use vitrine_core::StorageError;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Current Unix time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
