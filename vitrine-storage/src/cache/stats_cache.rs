//! Single-flight stats cache keyed on the dataset modification time.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::Mutex as AsyncMutex;
use vitrine_core::{calculate_stats, StatsSummary, StorageError, Timestamp};

use super::read::CacheRead;
use super::stats::{CacheCounters, CacheStats};
use crate::store::DatasetStore;
use crate::watcher::ChangeListener;
use crate::StorageResult;

/// What caused an invalidation. Only used for logging and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationSource {
    /// The watcher saw the dataset file change.
    FileChange,
    /// A forced refresh was requested.
    Refresh,
    /// Called directly, e.g. after this process wrote the dataset.
    Manual,
}

impl InvalidationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileChange => "file_change",
            Self::Refresh => "refresh",
            Self::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone)]
struct CachedStats {
    summary: Arc<StatsSummary>,
    last_modified: Timestamp,
    cached_at: Timestamp,
}

#[derive(Debug, Default)]
struct CacheState {
    /// Summary and the modification time it was computed against. Set and
    /// cleared as one value.
    entry: Option<CachedStats>,
    /// Bumped by every invalidation and at the start of every recompute.
    generation: u64,
    /// Number of recomputes that stored their result.
    completed: u64,
}

/// Cache for the dataset's [`StatsSummary`].
///
/// The entry is valid while the dataset's modification time is at or before
/// the time recorded with it. An unknown modification time is never valid.
///
/// At most one recompute runs at a time. The computing task owns `flight`;
/// readers that miss while it runs queue on the same lock and, once they get
/// it, return whatever the finished recompute stored instead of reading the
/// dataset again. The guard is released on every exit path, including a
/// cancelled future.
///
/// A recompute remembers the generation it started under and only stores
/// its result if no invalidation happened in between.
pub struct StatsCache {
    store: Arc<dyn DatasetStore>,
    state: Mutex<CacheState>,
    flight: AsyncMutex<()>,
    counters: CacheCounters,
}

impl std::fmt::Debug for StatsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsCache")
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl StatsCache {
    pub fn new(store: Arc<dyn DatasetStore>) -> Self {
        Self {
            store,
            state: Mutex::new(CacheState::default()),
            flight: AsyncMutex::new(()),
            counters: CacheCounters::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn DatasetStore> {
        &self.store
    }

    fn lock_state(&self) -> StorageResult<MutexGuard<'_, CacheState>> {
        self.state.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Return the summary, recomputing it if the entry is missing or stale.
    pub async fn read(&self) -> StorageResult<CacheRead<Arc<StatsSummary>>> {
        let (entry, completed) = {
            let state = self.lock_state()?;
            (state.entry.clone(), state.completed)
        };

        if let Some(entry) = entry {
            if self.is_fresh(&entry).await {
                self.counters.record_hit();
                tracing::debug!("Stats cache hit");
                return Ok(CacheRead::from_cache(
                    entry.summary,
                    entry.cached_at,
                    Some(entry.last_modified),
                ));
            }
        }

        self.counters.record_miss();
        tracing::debug!("Stats cache miss");
        self.recompute_after(completed).await
    }

    /// Clear the entry and recompute immediately.
    ///
    /// Always returns freshly computed data. A recompute already in flight
    /// is allowed to finish, but its result is discarded.
    pub async fn refresh(&self) -> StorageResult<Arc<StatsSummary>> {
        self.invalidate(InvalidationSource::Refresh)?;
        let _flight = self.flight.lock().await;
        Ok(self.compute().await?.into_value())
    }

    /// Clear the entry. The next read recomputes.
    pub fn invalidate(&self, source: InvalidationSource) -> StorageResult<()> {
        let mut state = self.lock_state()?;
        state.entry = None;
        state.generation = state.generation.wrapping_add(1);
        drop(state);

        self.counters.record_invalidation();
        tracing::info!(source = source.as_str(), "Stats cache invalidated");
        Ok(())
    }

    /// Current modification time of the dataset.
    pub async fn modification_time(&self) -> Option<Timestamp> {
        self.store.modification_time().await
    }

    /// The cached summary without validating it.
    pub fn peek(&self) -> Option<Arc<StatsSummary>> {
        self.lock_state()
            .ok()
            .and_then(|state| state.entry.as_ref().map(|e| Arc::clone(&e.summary)))
    }

    /// Modification time recorded with the cached summary.
    pub fn last_modified(&self) -> Option<Timestamp> {
        self.lock_state()
            .ok()
            .and_then(|state| state.entry.as_ref().map(|e| e.last_modified))
    }

    pub fn generation(&self) -> u64 {
        self.lock_state().map(|state| state.generation).unwrap_or(0)
    }

    /// True while a recompute holds the flight lock.
    pub fn is_computing(&self) -> bool {
        self.flight.try_lock().is_err()
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    async fn is_fresh(&self, entry: &CachedStats) -> bool {
        match self.store.modification_time().await {
            Some(current) => current <= entry.last_modified,
            None => false,
        }
    }

    /// Join the current flight or lead a new one.
    ///
    /// `seen_completed` is the store count observed before waiting. If it
    /// moved and an entry is present, another task computed it while we
    /// queued.
    async fn recompute_after(
        &self,
        seen_completed: u64,
    ) -> StorageResult<CacheRead<Arc<StatsSummary>>> {
        let _flight = self.flight.lock().await;

        {
            let state = self.lock_state()?;
            if state.completed != seen_completed {
                if let Some(entry) = &state.entry {
                    tracing::debug!("Joined in-flight stats recompute");
                    return Ok(CacheRead::from_storage(
                        Arc::clone(&entry.summary),
                        entry.cached_at,
                        Some(entry.last_modified),
                    ));
                }
            }
        }

        self.compute().await
    }

    /// Read the dataset and compute the summary. Caller holds `flight`.
    async fn compute(&self) -> StorageResult<CacheRead<Arc<StatsSummary>>> {
        let generation = {
            let mut state = self.lock_state()?;
            state.generation = state.generation.wrapping_add(1);
            state.generation
        };
        self.counters.record_recomputation();

        let before = self.store.modification_time().await;
        let items = match self.store.read_all().await {
            Ok(items) => items,
            Err(e) => {
                self.counters.record_failure();
                tracing::error!(error = %e, "Error updating stats cache");
                return Err(e);
            }
        };
        let summary = Arc::new(calculate_stats(&items));
        let after = self.store.modification_time().await;
        let cached_at = Utc::now();

        // A write that lands mid-read leaves before != after; the summary may
        // mix both versions, so it is returned but not cached.
        let last_modified = match (before, after) {
            (Some(b), Some(a)) if a == b => Some(a),
            _ => None,
        };

        let mut state = self.lock_state()?;
        if state.generation != generation {
            drop(state);
            self.counters.record_discard();
            tracing::debug!(generation, "Stats cache invalidated during recompute, result not stored");
        } else if let Some(last_modified) = last_modified {
            state.entry = Some(CachedStats {
                summary: Arc::clone(&summary),
                last_modified,
                cached_at,
            });
            state.completed = state.completed.wrapping_add(1);
            drop(state);
            tracing::info!(total = summary.total, "Stats cache updated");
        } else {
            drop(state);
            tracing::debug!(
                before = ?before,
                after = ?after,
                "Dataset modification time unknown or changed during read, result not stored"
            );
        }

        Ok(CacheRead::from_storage(summary, cached_at, last_modified))
    }
}

impl ChangeListener for StatsCache {
    fn on_dataset_changed(&self) {
        if let Err(e) = self.invalidate(InvalidationSource::FileChange) {
            tracing::error!(error = %e, "Failed to invalidate stats cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDatasetStore;
    use crate::CacheStatus;
    use vitrine_core::Item;

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                name: "Laptop".to_string(),
                category: Some("Electronics".to_string()),
                price: Some(1000.0),
                description: None,
            },
            Item {
                id: 2,
                name: "Chair".to_string(),
                category: None,
                price: Some(50.0),
                description: None,
            },
        ]
    }

    fn cache_with(store: &Arc<InMemoryDatasetStore>) -> StatsCache {
        StatsCache::new(Arc::clone(store) as Arc<dyn DatasetStore>)
    }

    #[tokio::test]
    async fn test_first_read_is_miss_then_hit() {
        let store = Arc::new(InMemoryDatasetStore::new(items()));
        let cache = cache_with(&store);

        let first = cache.read().await.unwrap();
        assert_eq!(first.status(), CacheStatus::Miss);
        assert_eq!(first.value().total, 2);

        let second = cache.read().await.unwrap();
        assert_eq!(second.status(), CacheStatus::Hit);
        assert_eq!(second.value(), first.value());
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn test_write_makes_entry_stale() {
        let store = Arc::new(InMemoryDatasetStore::new(items()));
        let cache = cache_with(&store);
        cache.read().await.unwrap();

        store.write_all(&items()[..1]).await.unwrap();
        let read = cache.read().await.unwrap();
        assert!(read.was_cache_miss());
        assert_eq!(read.value().total, 1);
    }

    #[tokio::test]
    async fn test_unknown_modification_time_never_cached() {
        let store = Arc::new(InMemoryDatasetStore::new(items()));
        store.set_modification_time(None).unwrap();
        let cache = cache_with(&store);

        assert!(cache.read().await.unwrap().was_cache_miss());
        assert!(cache.read().await.unwrap().was_cache_miss());
        assert!(cache.peek().is_none());
        assert!(cache.last_modified().is_none());
        assert_eq!(store.read_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_clears_entry_and_bumps_generation() {
        let store = Arc::new(InMemoryDatasetStore::new(items()));
        let cache = cache_with(&store);
        cache.read().await.unwrap();
        let generation = cache.generation();

        cache.invalidate(InvalidationSource::Manual).unwrap();
        assert!(cache.peek().is_none());
        assert!(cache.last_modified().is_none());
        assert!(cache.generation() > generation);
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_prior_state() {
        let store = Arc::new(InMemoryDatasetStore::new(items()));
        let cache = cache_with(&store);
        let first = cache.read().await.unwrap().into_value();

        store
            .fail_reads(Some(StorageError::Parse {
                reason: "truncated".to_string(),
            }))
            .unwrap();
        store.touch().unwrap();

        let err = cache.read().await.unwrap_err();
        assert!(matches!(err, StorageError::Parse { .. }));
        assert_eq!(cache.peek(), Some(first));
        assert!(!cache.is_computing());
        assert_eq!(cache.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_listener_invalidates() {
        let store = Arc::new(InMemoryDatasetStore::new(items()));
        let cache = cache_with(&store);
        cache.read().await.unwrap();

        cache.on_dataset_changed();
        assert!(cache.peek().is_none());
        assert!(cache.read().await.unwrap().was_cache_miss());
    }
}
