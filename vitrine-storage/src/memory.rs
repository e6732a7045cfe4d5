//! In-memory dataset store for tests and embedding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use vitrine_core::{Item, StorageError, Timestamp};

use crate::store::DatasetStore;
use crate::StorageResult;

#[derive(Debug, Default)]
struct MemoryState {
    items: Vec<Item>,
    modified: Option<Timestamp>,
    read_failure: Option<StorageError>,
    read_delay: Option<Duration>,
}

/// Dataset held in memory with a controllable modification time.
///
/// Counts `read_all` calls so callers can assert how many recomputations
/// actually touched the dataset.
#[derive(Debug, Default)]
pub struct InMemoryDatasetStore {
    state: Mutex<MemoryState>,
    reads: AtomicUsize,
}

impl InMemoryDatasetStore {
    /// Store holding `items`, stamped as modified now.
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                items,
                modified: Some(Utc::now()),
                ..MemoryState::default()
            }),
            reads: AtomicUsize::new(0),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> StorageResult<R> {
        let mut state = self.state.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(f(&mut state))
    }

    /// Number of `read_all` calls so far, failed ones included.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Override the reported modification time. `None` means unknown.
    pub fn set_modification_time(&self, modified: Option<Timestamp>) -> StorageResult<()> {
        self.with_state(|s| s.modified = modified)
    }

    /// Make subsequent reads fail with `error` (or succeed again with `None`).
    pub fn fail_reads(&self, error: Option<StorageError>) -> StorageResult<()> {
        self.with_state(|s| s.read_failure = error)
    }

    /// Delay every read by `delay`.
    pub fn set_read_delay(&self, delay: Option<Duration>) -> StorageResult<()> {
        self.with_state(|s| s.read_delay = delay)
    }

    /// Replace the items without touching the modification time.
    pub fn replace_items_silently(&self, items: Vec<Item>) -> StorageResult<()> {
        self.with_state(|s| s.items = items)
    }

    /// Advance the modification time past its current value.
    pub fn touch(&self) -> StorageResult<Timestamp> {
        self.with_state(bump_modified)
    }
}

fn bump_modified(state: &mut MemoryState) -> Timestamp {
    let now = Utc::now();
    let next = match state.modified {
        Some(prev) if prev >= now => prev + chrono::Duration::milliseconds(1),
        _ => now,
    };
    state.modified = Some(next);
    next
}

#[async_trait]
impl DatasetStore for InMemoryDatasetStore {
    async fn read_all(&self) -> StorageResult<Vec<Item>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let delay = self.with_state(|s| s.read_delay)?;
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        self.with_state(|s| match &s.read_failure {
            Some(err) => Err(err.clone()),
            None => Ok(s.items.clone()),
        })?
    }

    async fn write_all(&self, items: &[Item]) -> StorageResult<()> {
        self.with_state(|s| {
            s.items = items.to_vec();
            bump_modified(s);
        })
    }

    async fn modification_time(&self) -> Option<Timestamp> {
        self.with_state(|s| s.modified).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::NewItem;

    #[tokio::test]
    async fn test_write_advances_modification_time() {
        let store = InMemoryDatasetStore::new(Vec::new());
        let before = store.modification_time().await.unwrap();
        store.write_all(&[]).await.unwrap();
        let after = store.modification_time().await.unwrap();
        assert!(after > before);
    }

    #[tokio::test]
    async fn test_injected_failure_and_counter() {
        let store = InMemoryDatasetStore::new(Vec::new());
        store
            .fail_reads(Some(StorageError::Parse {
                reason: "bad".to_string(),
            }))
            .unwrap();
        assert!(store.read_all().await.is_err());
        store.fail_reads(None).unwrap();
        assert!(store.read_all().await.unwrap().is_empty());
        assert_eq!(store.read_count(), 2);
    }

    #[tokio::test]
    async fn test_default_append_uses_trait_impl() {
        let store = InMemoryDatasetStore::new(Vec::new());
        let item = store
            .append(NewItem {
                name: "Mug".to_string(),
                ..NewItem::default()
            })
            .await
            .unwrap();
        assert_eq!(store.read_all().await.unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn test_unknown_modification_time() {
        let store = InMemoryDatasetStore::new(Vec::new());
        store.set_modification_time(None).unwrap();
        assert!(store.modification_time().await.is_none());
    }
}
