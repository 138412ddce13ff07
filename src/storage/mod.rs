//! Client-side persisted state.
//!
//! Two scopes exist: "local" outlives a console restart when a file path is
//! configured, "session" always lives in memory.

pub mod flags;
pub mod search_draft;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::utils::lock;

pub use flags::{PendingBooking, PendingBookingStore, SignupBanner};
pub use search_draft::{SearchDraft, SearchDraftStore};

/// Key/value storage for small JSON documents.
pub trait StoragePort: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<Value>>;

    fn set(&self, key: &str, value: Value) -> AppResult<()>;

    fn remove(&self, key: &str) -> AppResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> AppResult<()> {
        lock(&self.entries).insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// All keys in one JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStorage {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::Config(format!("Unreadable storage file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::Config(format!(
                    "Failed to open storage file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Local storage loaded");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, Value>) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Internal(format!("Failed to encode storage: {}", e)))?;
        fs::write(&self.path, raw).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to write local storage");
            AppError::Internal(format!("Failed to write storage: {}", e))
        })
    }
}

impl StoragePort for JsonFileStorage {
    fn get(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> AppResult<()> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
