use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

/// Storage file name inside the data directory
const STORAGE_FILE: &str = "local_storage.json";

/// Persistent string key-value storage.
pub trait TokenStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Storage backed by a single JSON object file.
///
/// The whole file is read on every access and rewritten on every change.
/// A missing file reads as empty storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORAGE_FILE),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage file {}", self.path.display()))?;
        serde_json::from_str(&contents).context("Failed to parse storage file")
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write storage file {}", self.path.display()))
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// In-process storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.lock().insert(key.to_string(), value.to_string());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("clinicdesk-test-{:016x}", rand::random::<u64>()))
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let storage = FileStorage::new(&scratch_dir());
        assert_eq!(storage.get("aToken").unwrap(), None);
    }

    #[test]
    fn test_file_storage_set_get_remove() {
        let dir = scratch_dir();
        let mut storage = FileStorage::new(&dir);

        storage.set("aToken", "abc").unwrap();
        storage.set("other", "x").unwrap();
        assert_eq!(storage.get("aToken").unwrap().as_deref(), Some("abc"));

        // A fresh handle sees what was persisted
        let reopened = FileStorage::new(&dir);
        assert_eq!(reopened.get("aToken").unwrap().as_deref(), Some("abc"));

        storage.remove("aToken").unwrap();
        assert_eq!(storage.get("aToken").unwrap(), None);
        assert_eq!(storage.get("other").unwrap().as_deref(), Some("x"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_file_storage_corrupt_file_is_error() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(STORAGE_FILE), "not json").unwrap();

        let storage = FileStorage::new(&dir);
        assert!(storage.get("aToken").is_err());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let mut storage = MemoryStorage::new();
        let observer = storage.clone();
        storage.set("aToken", "abc").unwrap();
        assert_eq!(observer.get("aToken").unwrap().as_deref(), Some("abc"));
    }
}
