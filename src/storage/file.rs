//! File Storage Module
//!
//! A durable adapter persisting the whole key-value map as one JSON file.
//! The durable counterpart of a browser's local storage for processes that
//! outlive a single run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, StorageError};
use crate::storage::StorageAdapter;

// == File Storage ==
/// Single-file JSON adapter.
///
/// The map is held in memory and rewritten to disk on every mutation, so a
/// reopened `FileStorage` sees everything a previous instance wrote. Write
/// errors surface as [`StorageError`] for the safe wrapper to absorb.
#[derive(Debug)]
pub struct FileStorage {
    /// Backing file location
    path: PathBuf,
    /// In-memory view of the persisted map (BTreeMap keeps enumeration stable)
    data: BTreeMap<String, String>,
}

impl FileStorage {
    /// Opens a file-backed adapter, loading any previously persisted map.
    ///
    /// A missing file starts empty; a malformed file is reported as a
    /// serialization error rather than silently discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no persisted storage file, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(StorageError::Unavailable(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(Self { path, data })
    }

    /// Rewrites the backing file from the in-memory map.
    fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| {
                    StorageError::Unavailable(format!(
                        "cannot create {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }
        let contents = serde_json::to_string(&self.data)?;
        fs::write(&self.path, contents).map_err(|e| {
            if e.kind() == std::io::ErrorKind::StorageFull {
                StorageError::QuotaExceeded(format!("{}: {}", self.path.display(), e))
            } else {
                StorageError::Unavailable(format!("cannot write {}: {}", self.path.display(), e))
            }
        })
    }
}

impl StorageAdapter for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.data.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.data.clear();
        self.flush()
    }

    fn key_at(&self, index: usize) -> Result<Option<String>> {
        Ok(self.data.keys().nth(index).cloned())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }

    fn supports_enumeration(&self) -> bool {
        true
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.data.contains_key(key))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_starts_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("store.json")).unwrap();
        assert_eq!(storage.len().unwrap(), 0);
    }

    #[test]
    fn test_file_storage_set_and_get() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("store.json")).unwrap();

        storage.set_item("key1", "value1").unwrap();
        assert_eq!(storage.get_item("key1").unwrap(), Some("value1".to_string()));
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let mut storage = FileStorage::open(&path).unwrap();
            storage.set_item("key1", "value1").unwrap();
            storage.set_item("key2", "value2").unwrap();
        }

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.len().unwrap(), 2);
        assert_eq!(storage.get_item("key1").unwrap(), Some("value1".to_string()));
        assert_eq!(storage.get_item("key2").unwrap(), Some("value2".to_string()));
    }

    #[test]
    fn test_file_storage_remove_and_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut storage = FileStorage::open(&path).unwrap();

        storage.set_item("key1", "value1").unwrap();
        storage.set_item("key2", "value2").unwrap();

        storage.remove_item("key1").unwrap();
        assert_eq!(storage.get_item("key1").unwrap(), None);

        storage.clear().unwrap();
        assert_eq!(storage.len().unwrap(), 0);

        // Deletions must be durable too
        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 0);
    }

    #[test]
    fn test_file_storage_rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let result = FileStorage::open(&path);
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_enumeration() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("store.json")).unwrap();

        storage.set_item("b", "2").unwrap();
        storage.set_item("a", "1").unwrap();

        // BTreeMap enumerates in sorted key order
        assert!(storage.supports_enumeration());
        assert_eq!(storage.key_at(0).unwrap(), Some("a".to_string()));
        assert_eq!(storage.key_at(1).unwrap(), Some("b".to_string()));
        assert_eq!(storage.key_at(2).unwrap(), None);
    }
}
