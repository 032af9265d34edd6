use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;

use crate::snapshot::Snapshot;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is not valid json: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable home of the service [`Snapshot`].
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;
    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
    /// Removing a snapshot that does not exist succeeds.
    async fn delete(&self) -> Result<(), PersistenceError>;
}

#[async_trait]
impl<S: SnapshotStore + ?Sized> SnapshotStore for Arc<S> {
    async fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        (**self).load().await
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        (**self).save(snapshot).await
    }

    async fn delete(&self) -> Result<(), PersistenceError> {
        (**self).delete().await
    }
}

/// Pretty-printed JSON file. Writes go to a sibling temp file first and are
/// renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn delete(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keeps the snapshot in process memory. Useful when durability is not
/// wanted and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
        }
    }

    pub fn peek(&self) -> Option<Snapshot> {
        self.slot.lock().map(|s| s.clone()).unwrap_or_else(|p| p.into_inner().clone())
    }

    fn replace(&self, value: Option<Snapshot>) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        Ok(self.peek())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        self.replace(Some(snapshot.clone()));
        Ok(())
    }

    async fn delete(&self) -> Result<(), PersistenceError> {
        self.replace(None);
        Ok(())
    }
}
