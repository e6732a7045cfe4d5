//! Stats cache with file-change invalidation.
//!
//! [`StatsCache`] holds at most one computed [`StatsSummary`](vitrine_core::StatsSummary)
//! and checks it against the dataset's modification time on every read.
//! Recomputation is single-flight: concurrent readers that find the cache
//! invalid wait on the task already computing and share its result.
//!
//! Reads return a [`CacheRead<T>`] so callers can report whether the data
//! came from the cache (`HIT`) or was recomputed (`MISS`).
//!
//! # Example
//!
//! ```ignore
//! let cache = StatsCache::new(store);
//! let read = cache.read().await?;
//! response.header("X-Cache", read.status().as_str());
//! ```

pub mod read;
pub mod stats;
pub mod stats_cache;

pub use read::{CacheRead, CacheStatus};
pub use stats::{CacheCounters, CacheStats};
pub use stats_cache::{InvalidationSource, StatsCache};
