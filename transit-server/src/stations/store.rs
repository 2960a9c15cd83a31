//! Persistent key-value storage.
//!
//! The station directory persists its geocoded stations through this
//! interface so the storage backend can be swapped (disk in production,
//! memory in tests).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use super::error::StationError;

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StationError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StationError>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StationError>;
}

/// Stores each key as a JSON file in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File path for a key. Characters outside `[A-Za-z0-9_-]` become `_`.
    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StationError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StationError::Cache {
                message: format!("failed to read cache file: {}", e),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StationError> {
        // Create parent directories if needed
        if !self.dir.as_os_str().is_empty() && !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|e| StationError::Cache {
                message: format!("failed to create cache directory: {}", e),
            })?;
        }

        std::fs::write(self.path_for(key), value).map_err(|e| StationError::Cache {
            message: format!("failed to write cache file: {}", e),
        })
    }

    fn remove(&self, key: &str) -> Result<(), StationError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StationError::Cache {
                message: format!("failed to remove cache file: {}", e),
            }),
        }
    }
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StationError> {
        self.values.lock().map_err(|_| StationError::Cache {
            message: "memory store lock poisoned".to_string(),
        })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StationError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StationError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StationError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("stations").unwrap(), None);

        store.set("stations", "[1,2]").unwrap();
        assert_eq!(store.get("stations").unwrap().as_deref(), Some("[1,2]"));

        store.set("stations", "[3]").unwrap();
        assert_eq!(store.get("stations").unwrap().as_deref(), Some("[3]"));

        store.remove("stations").unwrap();
        assert_eq!(store.get("stations").unwrap(), None);

        // Removing twice is fine
        store.remove("stations").unwrap();
    }

    #[test]
    fn memory_store_roundtrip() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempdir().unwrap();
        exercise(&FileStore::new(dir.path()));
    }

    #[test]
    fn file_store_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("dir");
        let store = FileStore::new(&nested);

        store.set("cached_stations", "[]").unwrap();
        assert!(nested.join("cached_stations.json").exists());
    }

    #[test]
    fn file_store_sanitises_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("../escape", "x").unwrap();
        assert!(dir.path().join("___escape.json").exists());
        assert_eq!(store.get("../escape").unwrap().as_deref(), Some("x"));
    }
}
