//! Memory Storage Module
//!
//! In-memory adapters backing non-browser runtimes and probe fallbacks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Result, StorageError};
use crate::storage::StorageAdapter;

// == Memory Storage ==
/// Plain in-memory map adapter.
///
/// Lives as long as the process (or the owning cache instance). Keys are
/// enumerable in insertion order, which keeps `key_at` stable across calls
/// as long as no key is removed.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Stored values by key
    data: HashMap<String, String>,
    /// Insertion order, for key-at-index enumeration
    order: Vec<String>,
}

impl MemoryStorage {
    /// Creates an empty in-memory adapter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.data.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.data.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.data.clear();
        self.order.clear();
        Ok(())
    }

    fn key_at(&self, index: usize) -> Result<Option<String>> {
        Ok(self.order.get(index).cloned())
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

// == Shared Memory Storage ==
/// Clonable handle over a single in-memory map.
///
/// Stands in for a process-lifetime shared medium: every clone reads and
/// writes the same underlying map, so two cache instances handed clones of
/// one `SharedMemoryStorage` observe each other's writes.
#[derive(Debug, Clone, Default)]
pub struct SharedMemoryStorage {
    inner: Arc<Mutex<MemoryStorage>>,
}

impl SharedMemoryStorage {
    /// Creates an empty shared in-memory adapter.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryStorage>> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Unavailable("shared memory storage poisoned".to_string()))
    }
}

impl StorageAdapter for SharedMemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.lock()?.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.lock()?.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.lock()?.remove_item(key)
    }

    fn clear(&mut self) -> Result<()> {
        self.lock()?.clear()
    }

    fn key_at(&self, index: usize) -> Result<Option<String>> {
        self.lock()?.key_at(index)
    }

    fn len(&self) -> Result<usize> {
        self.lock()?.len()
    }

    fn supports_enumeration(&self) -> bool {
        true
    }

    fn contains(&self, key: &str) -> Result<bool> {
        self.lock()?.contains(key)
    }
}
