//! Durable key-value storage
//!
//! A string-to-string store that outlives a single run. Values are plain
//! strings so any backend (a TOML file, browser local storage, a test map)
//! can satisfy the contract.

use obby_core::{ObbyError, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Minimal durable store contract: `get` and `set` on string keys.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` means the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, overwriting any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A store whose backend is gone. Every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Err(ObbyError::PersistenceError(format!("read {}: store unavailable", key)))
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(ObbyError::PersistenceError(format!("write {}: store unavailable", key)))
    }
}

/// A store backed by a flat TOML table on disk.
///
/// Every `set` rewrites the file, so a crash between runs loses nothing that
/// was already reported as written.
#[derive(Debug)]
pub struct TomlFileStore {
    path: PathBuf,
    data: BTreeMap<String, String>,
}

impl TomlFileStore {
    /// Open a store at `path`. A missing file is an empty store; a file that
    /// cannot be parsed is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let table: toml::map::Map<String, toml::Value> = toml::from_str(&content)?;
            table
                .into_iter()
                .map(|(k, v)| {
                    let value = match v {
                        toml::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (k, value)
                })
                .collect()
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove a key and persist the change. Returns the old value.
    pub fn remove(&mut self, key: &str) -> Result<Option<String>> {
        let old = self.data.remove(key);
        if old.is_some() {
            self.flush()?;
        }
        Ok(old)
    }

    /// All keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        self.data.keys().map(|k| k.as_str()).collect()
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut table = toml::map::Map::new();
        for (k, v) in &self.data {
            table.insert(k.clone(), toml::Value::String(v.clone()));
        }
        let content = toml::to_string_pretty(&table)?;
        std::fs::write(&self.path, content).map_err(|e| {
            ObbyError::PersistenceError(format!("write {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("obby_persist_test_{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn memory_set_and_get() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("score").unwrap(), None);
        store.set("score", "42").unwrap();
        assert_eq!(store.get("score").unwrap().as_deref(), Some("42"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_overwrite() {
        let mut store = MemoryStore::new();
        store.set("val", "1").unwrap();
        store.set("val", "2").unwrap();
        assert_eq!(store.get("val").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn failing_store_errors_on_every_call() {
        let mut store = FailingStore;
        assert!(matches!(store.get("k"), Err(ObbyError::PersistenceError(_))));
        assert!(store.set("k", "v").is_err());
    }

    #[test]
    fn file_missing_is_empty() {
        let store = TomlFileStore::open(temp_path("missing.toml")).unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn file_save_and_reopen() {
        let path = temp_path("store.toml");

        let mut store = TomlFileStore::open(&path).unwrap();
        store.set("connectus.obby.bestTime", "41250").unwrap();
        store.set("name", "Player").unwrap();

        let reopened = TomlFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("connectus.obby.bestTime").unwrap().as_deref(),
            Some("41250")
        );
        assert_eq!(reopened.keys(), vec!["connectus.obby.bestTime", "name"]);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_remove_persists() {
        let path = temp_path("remove.toml");
        let mut store = TomlFileStore::open(&path).unwrap();
        store.set("a", "1").unwrap();
        assert_eq!(store.remove("a").unwrap().as_deref(), Some("1"));

        let reopened = TomlFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap(), None);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_non_string_values_are_stringified() {
        let path = temp_path("numbers.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "best = 1200\n").unwrap();

        let store = TomlFileStore::open(&path).unwrap();
        assert_eq!(store.get("best").unwrap().as_deref(), Some("1200"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_corrupt_is_error() {
        let path = temp_path("corrupt.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert!(TomlFileStore::open(&path).is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
