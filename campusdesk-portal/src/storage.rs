//! Durable client-side storage
//!
//! A string key/value store in the shape of browser local storage, plus the
//! versioned snapshot envelope the state stores write into it.

use campusdesk_core::{CampusError, CampusResult, ErrorContext};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: u32 = 0;

/// Key/value storage that outlives the process
pub trait DurableStorage: Send + Sync {
    /// Read the raw value stored under `key`
    fn get_item(&self, key: &str) -> CampusResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> CampusResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove_item(&self, key: &str) -> CampusResult<()>;
}

/// Serialized form of a store: `{ "state": ..., "version": 0 }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub state: T,
    pub version: u32,
}

/// Write `state` under `key` as a versioned snapshot
pub fn save_snapshot<T: Serialize>(
    storage: &dyn DurableStorage,
    key: &str,
    state: &T,
) -> CampusResult<()> {
    let snapshot = Snapshot {
        state,
        version: SNAPSHOT_VERSION,
    };
    let json = serde_json::to_string(&snapshot)?;
    storage.set_item(key, &json)
}

/// Read the snapshot stored under `key`.
///
/// Missing, unreadable and corrupt snapshots all yield `None`; the latter two
/// are logged.
pub fn load_snapshot<T: DeserializeOwned>(storage: &dyn DurableStorage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted state");
            return None;
        }
    };

    match serde_json::from_str::<Snapshot<T>>(&raw) {
        Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => Some(snapshot.state),
        Ok(snapshot) => {
            warn!(key, version = snapshot.version, "Ignoring snapshot with unknown version");
            None
        }
        Err(e) => {
            warn!(key, error = %e, "Ignoring corrupt persisted state");
            None
        }
    }
}

/// In-memory storage. Clones share the same contents, so a clone handed to a
/// freshly constructed store behaves like the same browser profile after a
/// page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned(operation: &str) -> CampusError {
        CampusError::Storage {
            message: "memory storage lock poisoned".to_string(),
            source: None,
            context: ErrorContext::new("memory_storage").with_operation(operation),
        }
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> CampusResult<Option<String>> {
        let items = self.items.read().map_err(|_| Self::poisoned("get_item"))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> CampusResult<()> {
        let mut items = self.items.write().map_err(|_| Self::poisoned("set_item"))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CampusResult<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| Self::poisoned("remove_item"))?;
        items.remove(key);
        Ok(())
    }
}

/// File-backed storage: one `<key>.json` file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    storage_dir: PathBuf,
}

impl FileStorage {
    /// Create the storage, creating `storage_dir` if it doesn't exist
    pub fn new<P: AsRef<Path>>(storage_dir: P) -> CampusResult<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&storage_dir).map_err(|e| CampusError::Storage {
            message: format!(
                "Failed to create storage directory {}: {}",
                storage_dir.display(),
                e
            ),
            source: Some(Box::new(e)),
            context: ErrorContext::new("file_storage")
                .with_operation("create_dir")
                .with_suggestion("Check storage.data_dir in your configuration"),
        })?;

        info!("Client storage initialized at: {}", storage_dir.display());

        Ok(Self { storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn item_path(&self, key: &str) -> CampusResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(CampusError::storage(
                format!("Invalid storage key: {:?}", key),
                "file_storage",
            ));
        }
        Ok(self.storage_dir.join(format!("{}.json", key)))
    }
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> CampusResult<Option<String>> {
        let path = self.item_path(key)?;

        match std::fs::read_to_string(&path) {
            Ok(data) => {
                debug!("Loaded {} from {}", key, path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CampusError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> CampusResult<()> {
        let path = self.item_path(key)?;
        let tmp = path.with_extension("json.tmp");

        // Write-then-rename so a crash never leaves a half-written snapshot
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;

        debug!("Saved {} to {}", key, path.display());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CampusResult<()> {
        let path = self.item_path(key)?;

        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CampusError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    #[test]
    fn memory_storage_clones_share_contents() {
        let storage = MemoryStorage::new();
        let reloaded = storage.clone();

        storage.set_item("k", "v").unwrap();
        assert_eq!(reloaded.get_item("k").unwrap().as_deref(), Some("v"));

        reloaded.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
        assert!(storage.remove_item("k").is_ok());
    }

    #[test]
    fn file_storage_persists_items() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("state")).unwrap();

        assert_eq!(storage.get_item("auth-storage").unwrap(), None);
        storage.set_item("auth-storage", "{}").unwrap();

        let reopened = FileStorage::new(dir.path().join("state")).unwrap();
        assert_eq!(
            reopened.get_item("auth-storage").unwrap().as_deref(),
            Some("{}")
        );
        assert!(dir.path().join("state").join("auth-storage.json").exists());

        reopened.remove_item("auth-storage").unwrap();
        assert_eq!(storage.get_item("auth-storage").unwrap(), None);
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(storage.set_item("../escape", "x").is_err());
        assert!(storage.set_item("", "x").is_err());
        assert!(storage.get_item("a/b").is_err());
    }

    #[test]
    fn snapshot_envelope_format() {
        let storage = MemoryStorage::new();
        save_snapshot(&storage, "counter", &Counter { count: 3 }).unwrap();

        let raw = storage.get_item("counter").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["state"]["count"], 3);
        assert_eq!(value["version"], 0);

        let loaded: Option<Counter> = load_snapshot(&storage, "counter");
        assert_eq!(loaded, Some(Counter { count: 3 }));
    }

    #[test]
    fn corrupt_or_foreign_snapshots_are_ignored() {
        let storage = MemoryStorage::new();

        storage.set_item("counter", "not json").unwrap();
        assert_eq!(load_snapshot::<Counter>(&storage, "counter"), None);

        storage
            .set_item("counter", r#"{"state":{"count":1},"version":7}"#)
            .unwrap();
        assert_eq!(load_snapshot::<Counter>(&storage, "counter"), None);

        assert_eq!(load_snapshot::<Counter>(&storage, "missing"), None);
    }
}
