//! Cache read results carrying hit/miss and staleness metadata.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitrine_core::Timestamp;

/// Whether a read was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Header value (`HIT` / `MISS`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a cache read.
#[derive(Debug, Clone)]
pub struct CacheRead<T> {
    value: T,
    /// When the value was computed.
    cached_at: Timestamp,
    /// Dataset modification time the value was computed against.
    last_modified: Option<Timestamp>,
    status: CacheStatus,
}

impl<T> CacheRead<T> {
    /// A value served from the cache.
    pub fn from_cache(value: T, cached_at: Timestamp, last_modified: Option<Timestamp>) -> Self {
        Self {
            value,
            cached_at,
            last_modified,
            status: CacheStatus::Hit,
        }
    }

    /// A value produced by a recomputation.
    pub fn from_storage(value: T, cached_at: Timestamp, last_modified: Option<Timestamp>) -> Self {
        Self {
            value,
            cached_at,
            last_modified,
            status: CacheStatus::Miss,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn status(&self) -> CacheStatus {
        self.status
    }

    pub fn was_cache_hit(&self) -> bool {
        self.status == CacheStatus::Hit
    }

    pub fn was_cache_miss(&self) -> bool {
        self.status == CacheStatus::Miss
    }

    pub fn cached_at(&self) -> Timestamp {
        self.cached_at
    }

    pub fn last_modified(&self) -> Option<Timestamp> {
        self.last_modified
    }

    /// Time elapsed since the value was computed.
    pub fn staleness(&self) -> Duration {
        (chrono::Utc::now() - self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn map<U, F>(self, f: F) -> CacheRead<U>
    where
        F: FnOnce(T) -> U,
    {
        CacheRead {
            value: f(self.value),
            cached_at: self.cached_at,
            last_modified: self.last_modified,
            status: self.status,
        }
    }
}

impl<T> AsRef<T> for CacheRead<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
