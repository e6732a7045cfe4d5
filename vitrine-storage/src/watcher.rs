//! Filesystem watch on the dataset file.
//!
//! The parent directory is watched rather than the file itself so that
//! editors and writers that replace the file by rename keep triggering
//! events after the first save.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

/// Receives dataset change notifications.
///
/// Called from the watcher's own thread, so implementations must not block.
pub trait ChangeListener: Send + Sync + 'static {
    fn on_dataset_changed(&self);
}

/// Errors raised while arming a watch.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Cannot watch {path}: path has no file name")]
    InvalidPath { path: PathBuf },

    #[error("Watch backend error: {0}")]
    Notify(#[from] notify::Error),

    #[error("Watcher lock poisoned")]
    LockPoisoned,
}

/// Whether `event` concerns the file called `file_name`.
pub fn is_dataset_change(event: &Event, file_name: &OsStr) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Any | EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name))
}

/// Scoped watch on a dataset file.
///
/// Dropping the watcher releases the OS handle.
pub struct DatasetWatcher {
    path: PathBuf,
    listener: Arc<dyn ChangeListener>,
    inner: Mutex<Option<RecommendedWatcher>>,
}

impl std::fmt::Debug for DatasetWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetWatcher")
            .field("path", &self.path)
            .field("armed", &self.is_armed())
            .finish()
    }
}

impl DatasetWatcher {
    /// Create an unarmed watcher for `path`.
    pub fn new(path: impl Into<PathBuf>, listener: Arc<dyn ChangeListener>) -> Self {
        Self {
            path: path.into(),
            listener,
            inner: Mutex::new(None),
        }
    }

    /// Create a watcher and arm it.
    pub fn watch(
        path: impl Into<PathBuf>,
        listener: Arc<dyn ChangeListener>,
    ) -> Result<Self, WatchError> {
        let watcher = Self::new(path, listener);
        watcher.arm()?;
        Ok(watcher)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start watching. Re-arming replaces the previous watch.
    pub fn arm(&self) -> Result<(), WatchError> {
        let file_name: OsString = self
            .path
            .file_name()
            .ok_or_else(|| WatchError::InvalidPath {
                path: self.path.clone(),
            })?
            .to_os_string();
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let listener = Arc::clone(&self.listener);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if is_dataset_change(&event, &file_name) {
                    tracing::info!(kind = ?event.kind, "Data file changed, invalidating stats cache");
                    listener.on_dataset_changed();
                }
            }
            Err(e) => tracing::warn!(error = %e, "File watcher error"),
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let mut slot = self.inner.lock().map_err(|_| WatchError::LockPoisoned)?;
        if slot.replace(watcher).is_some() {
            tracing::debug!(path = %self.path.display(), "Replaced existing file watcher");
        }
        tracing::info!(path = %self.path.display(), "File watcher initialized for stats cache");
        Ok(())
    }

    pub fn is_armed(&self) -> bool {
        self.inner
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Stop watching. Returns false if nothing was armed.
    pub fn close(&self) -> bool {
        let closed = match self.inner.lock() {
            Ok(mut slot) => slot.take().is_some(),
            Err(poisoned) => poisoned.into_inner().take().is_some(),
        };
        if closed {
            tracing::info!(path = %self.path.display(), "File watcher closed");
        }
        closed
    }
}

impl Drop for DatasetWatcher {
    fn drop(&mut self) {
        self.close();
    }
}
