//! Cache Store Module
//!
//! The TTL-aware layer over a selected storage adapter. Owns the registry
//! of keys written during this instance's lifetime and the `cache_` key
//! namespace separating TTL records from raw persisted values.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::record::{current_timestamp_ms, CacheRecord, TimeUnit};
use crate::config::Config;
use crate::storage::{select_storage, SafeStorage, StorageAdapter};

// == Cache ==
/// TTL-aware key-value cache over a storage adapter.
///
/// Every operation is total: storage and serialization failures are logged
/// and collapse to `false` / `None` / `0`, never a panic or an error value.
/// Callers must treat those defaults as covering both "absent" and
/// "failed".
///
/// The active key registry is in-process state, rebuilt empty for every
/// instance. [`clear`](Cache::clear) therefore only removes records written
/// through this instance; records left behind by an earlier process are
/// reachable only via [`delete`](Cache::delete) or their own expiration.
pub struct Cache {
    /// Error-absorbing storage handle, resolved once at construction
    storage: SafeStorage<Box<dyn StorageAdapter>>,
    /// Logical keys written during this instance's lifetime
    registry: HashSet<String>,
    /// Prefix namespacing TTL records within the storage medium
    prefix: String,
}

impl Cache {
    // == Constructors ==
    /// Creates a cache over the storage medium the configuration names.
    pub fn new(config: Config) -> Self {
        let storage = select_storage(config.storage, None);
        Self {
            storage,
            registry: HashSet::new(),
            prefix: config.cache_prefix,
        }
    }

    /// Creates a cache over a host-provided storage backend.
    ///
    /// The backend is probed with a sentinel write first; if it rejects the
    /// probe, a warning is logged and the cache falls back to in-memory
    /// storage.
    pub fn with_backend(config: Config, backend: Box<dyn StorageAdapter>) -> Self {
        let storage = select_storage(config.storage, Some(backend));
        Self {
            storage,
            registry: HashSet::new(),
            prefix: config.cache_prefix,
        }
    }

    /// The namespaced storage key holding a logical key's TTL record.
    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // == Set ==
    /// Stores a value without touching its expiration.
    ///
    /// Shorthand for [`set_for`](Cache::set_for) with duration 0: a prior
    /// record's expiration carries over, a fresh record never expires.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> bool {
        self.set_for(key, value, 0, TimeUnit::default())
    }

    // == Set For ==
    /// Stores a value with a TTL.
    ///
    /// A positive `duration` sets expiration to now plus the duration in
    /// `unit`. Duration 0 preserves the previously stored expiration, if
    /// any, so a value refresh does not extend or shorten an existing TTL.
    ///
    /// Returns false on any serialization or storage failure.
    pub fn set_for<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
        duration: u64,
        unit: TimeUnit,
    ) -> bool {
        let expire = if duration > 0 {
            current_timestamp_ms() + unit.to_millis(duration)
        } else {
            self.load_record(key).map(|record| record.expire).unwrap_or(0)
        };

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache value");
                return false;
            }
        };

        let record = CacheRecord::new(value, expire);
        let serialized = match serde_json::to_string(&record) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache record");
                return false;
            }
        };

        if !self.storage.set(&self.storage_key(key), &serialized) {
            return false;
        }
        self.registry.insert(key.to_string());
        true
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expiration is lazy: an expired record is deleted here, on read, and
    /// reported as absent. Missing keys and undeserializable records also
    /// yield `None`.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let record = self.load_record(key)?;

        if record.is_expired() {
            debug!(key, "cache record expired, deleting");
            self.delete(key);
            return None;
        }

        match serde_json::from_value(record.value) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "failed to deserialize cache value");
                None
            }
        }
    }

    // == Delete ==
    /// Removes a key's record and deregisters it. Idempotent.
    pub fn delete(&mut self, key: &str) {
        self.storage.remove(&self.storage_key(key));
        self.registry.remove(key);
    }

    // == Clear ==
    /// Removes every record registered during this instance's lifetime.
    pub fn clear(&mut self) {
        let keys: Vec<String> = self.registry.drain().collect();
        for key in keys {
            let storage_key = format!("{}{}", self.prefix, key);
            self.storage.remove(&storage_key);
        }
    }

    // == Remaining ==
    /// Returns a key's remaining lifetime, floored to `unit`.
    ///
    /// 0 when the key is absent, already expired, or has no expiration.
    pub fn remaining(&self, key: &str, unit: TimeUnit) -> u64 {
        match self.load_record(key) {
            Some(record) => unit.from_millis(record.remaining_ms()),
            None => 0,
        }
    }

    // == Raw Persistence ==
    /// Stores a value directly under `key`, with no TTL record and no
    /// namespacing. The low-level primitive beneath the TTL operations.
    pub fn set_raw<T: Serialize>(&mut self, key: &str, value: &T) -> bool {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize raw value");
                return false;
            }
        };
        self.storage.set(key, &serialized)
    }

    /// Reads a value stored via [`set_raw`](Cache::set_raw).
    pub fn get_raw<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "failed to deserialize raw value");
                None
            }
        }
    }

    /// Reads a logical key's TTL record, expired or not.
    fn load_record(&self, key: &str) -> Option<CacheRecord> {
        self.get_raw(&self.storage_key(key))
    }

    // == Introspection ==
    /// Number of keys registered during this instance's lifetime.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true if no keys have been registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Borrows the underlying storage, for bulk utilities.
    pub fn storage(&self) -> &SafeStorage<Box<dyn StorageAdapter>> {
        &self.storage
    }

    /// Mutably borrows the underlying storage, for bulk utilities.
    pub fn storage_mut(&mut self) -> &mut SafeStorage<Box<dyn StorageAdapter>> {
        &mut self.storage
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
