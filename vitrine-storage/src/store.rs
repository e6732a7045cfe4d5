//! Dataset store trait and the JSON file implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use vitrine_core::{next_item_id, Item, NewItem, StorageError, Timestamp};

use crate::{now_millis, StorageResult};

/// Wholesale access to the item collection.
///
/// The collection is always read and written as a unit. Implementations
/// must be safe to share across tasks.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Read every record. Fails if the dataset is missing or malformed.
    async fn read_all(&self) -> StorageResult<Vec<Item>>;

    /// Replace the whole collection.
    async fn write_all(&self, items: &[Item]) -> StorageResult<()>;

    /// Last write time of the dataset, or `None` when it cannot be determined.
    async fn modification_time(&self) -> Option<Timestamp>;

    /// Filesystem path backing the dataset, if any.
    fn location(&self) -> Option<&Path> {
        None
    }

    /// Append a record with a server-assigned id and return it.
    async fn append(&self, new_item: NewItem) -> StorageResult<Item> {
        let mut items = self.read_all().await?;
        let item = new_item.into_item(next_item_id(&items, now_millis()));
        items.push(item.clone());
        self.write_all(&items).await?;
        Ok(item)
    }
}

/// Dataset persisted as a pretty-printed JSON array on disk.
///
/// Writes go to a sibling temp file and are renamed into place, so readers
/// never observe a half-written array.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_unlocked(&self, items: &[Item]) -> StorageResult<()> {
        let body = serde_json::to_string_pretty(items).map_err(|e| StorageError::Serialize {
            reason: e.to_string(),
        })?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| StorageError::from_io(&tmp, &e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::from_io(&self.path, &e))?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "Dataset written");
        Ok(())
    }
}

#[async_trait]
impl DatasetStore for JsonFileStore {
    async fn read_all(&self) -> StorageResult<Vec<Item>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::from_io(&self.path, &e))?;
        serde_json::from_str(&raw).map_err(|e| StorageError::Parse {
            reason: e.to_string(),
        })
    }

    async fn write_all(&self, items: &[Item]) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_unlocked(items).await
    }

    async fn modification_time(&self) -> Option<Timestamp> {
        match tokio::fs::metadata(&self.path).await.and_then(|m| m.modified()) {
            Ok(modified) => Some(Timestamp::from(modified)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Error getting file modification time");
                None
            }
        }
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }

    async fn append(&self, new_item: NewItem) -> StorageResult<Item> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_all().await?;
        let item = new_item.into_item(next_item_id(&items, now_millis()));
        items.push(item.clone());
        self.write_unlocked(&items).await?;
        Ok(item)
    }
}
