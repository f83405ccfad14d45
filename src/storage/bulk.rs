//! Bulk Storage Utilities
//!
//! Batch operations, usage accounting and JSON object helpers that run
//! directly over any storage adapter, without the cache layer's key
//! namespacing.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::storage::StorageAdapter;

// == All Keys ==
/// Enumerates every key in the adapter, in the adapter's index order.
///
/// Adapters without enumeration capability yield an empty sequence; a
/// failed index read is logged and enumeration stops at the keys gathered
/// so far.
pub fn all_keys<S: StorageAdapter + ?Sized>(storage: &S) -> Vec<String> {
    let mut keys = Vec::new();
    if !storage.supports_enumeration() {
        return keys;
    }

    let count = match storage.len() {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "failed to read storage length for enumeration");
            return keys;
        }
    };

    for index in 0..count {
        match storage.key_at(index) {
            Ok(Some(key)) => keys.push(key),
            Ok(None) => break,
            Err(e) => {
                warn!(index, error = %e, "failed to enumerate storage key");
                break;
            }
        }
    }
    keys
}

// == Storage Usage ==
/// Estimates the bytes consumed by the adapter's contents.
///
/// Uses the UTF-16 estimate browsers apply to Web Storage: two bytes per
/// code unit of every key and value. Returns 0 on failure.
pub fn storage_usage<S: StorageAdapter + ?Sized>(storage: &S) -> u64 {
    let mut total: u64 = 0;
    for key in all_keys(storage) {
        match storage.get_item(&key) {
            Ok(Some(value)) => {
                let units = key.encode_utf16().count() + value.encode_utf16().count();
                total += (units as u64) * 2;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(key, error = %e, "failed to read item while measuring usage");
                return 0;
            }
        }
    }
    total
}

// == Set Object ==
/// Serializes any value to JSON and stores it under `key`.
///
/// Returns false on serialization or storage failure.
pub fn set_object<S, T>(storage: &mut S, key: &str, value: &T) -> bool
where
    S: StorageAdapter + ?Sized,
    T: Serialize,
{
    let serialized = match serde_json::to_string(value) {
        Ok(serialized) => serialized,
        Err(e) => {
            warn!(key, error = %e, "failed to serialize object");
            return false;
        }
    };
    match storage.set_item(key, &serialized) {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "failed to store object");
            false
        }
    }
}

// == Get Object ==
/// Reads and deserializes the JSON value under `key`.
///
/// Returns `None` on absence, storage failure or malformed JSON.
pub fn get_object<S, T>(storage: &S, key: &str) -> Option<T>
where
    S: StorageAdapter + ?Sized,
    T: DeserializeOwned,
{
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "failed to read object");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "failed to deserialize object");
            None
        }
    }
}

// == Set Multiple ==
/// Stores every pair, returning true iff all writes succeeded.
///
/// A single key's failure is logged and skipped; the rest of the batch
/// still runs.
pub fn set_multiple<S, K, V>(storage: &mut S, entries: &[(K, V)]) -> bool
where
    S: StorageAdapter + ?Sized,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut all_success = true;
    for (key, value) in entries {
        if let Err(e) = storage.set_item(key.as_ref(), value.as_ref()) {
            warn!(key = key.as_ref(), error = %e, "failed to set key in batch");
            all_success = false;
        }
    }
    all_success
}

// == Get Multiple ==
/// Reads every key, mapping each to its value or `None`.
pub fn get_multiple<S, K>(storage: &S, keys: &[K]) -> HashMap<String, Option<String>>
where
    S: StorageAdapter + ?Sized,
    K: AsRef<str>,
{
    let mut result = HashMap::with_capacity(keys.len());
    for key in keys {
        let key = key.as_ref();
        let value = match storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to get key in batch");
                None
            }
        };
        result.insert(key.to_string(), value);
    }
    result
}

// == Remove Multiple ==
/// Removes every key, returning true iff all removals succeeded.
pub fn remove_multiple<S, K>(storage: &mut S, keys: &[K]) -> bool
where
    S: StorageAdapter + ?Sized,
    K: AsRef<str>,
{
    let mut all_success = true;
    for key in keys {
        if let Err(e) = storage.remove_item(key.as_ref()) {
            warn!(key = key.as_ref(), error = %e, "failed to remove key in batch");
            all_success = false;
        }
    }
    all_success
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, StorageError};
    use crate::storage::MemoryStorage;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        visits: u32,
    }

    #[test]
    fn test_all_keys_lists_everything() {
        let mut storage = MemoryStorage::new();
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        let keys = all_keys(&storage);
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_all_keys_empty_without_enumeration() {
        struct Opaque;

        impl StorageAdapter for Opaque {
            fn get_item(&self, _key: &str) -> Result<Option<String>> {
                Ok(Some("hidden".to_string()))
            }
            fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
                Ok(())
            }
            fn remove_item(&mut self, _key: &str) -> Result<()> {
                Ok(())
            }
            fn clear(&mut self) -> Result<()> {
                Ok(())
            }
        }

        assert!(all_keys(&Opaque).is_empty());
    }

    #[test]
    fn test_storage_usage_utf16_estimate() {
        let mut storage = MemoryStorage::new();
        storage.set_item("x", "yz").unwrap();

        // (1 + 2) code units * 2 bytes
        assert_eq!(storage_usage(&storage), 6);
    }

    #[test]
    fn test_storage_usage_counts_utf16_units() {
        let mut storage = MemoryStorage::new();
        // One supplementary-plane character = two UTF-16 code units
        storage.set_item("k", "𝄞").unwrap();

        assert_eq!(storage_usage(&storage), (1 + 2) * 2);
    }

    #[test]
    fn test_storage_usage_empty() {
        let storage = MemoryStorage::new();
        assert_eq!(storage_usage(&storage), 0);
    }

    #[test]
    fn test_object_round_trip() {
        let mut storage = MemoryStorage::new();
        let profile = Profile {
            name: "ada".to_string(),
            visits: 3,
        };

        assert!(set_object(&mut storage, "profile", &profile));
        let loaded: Profile = get_object(&storage, "profile").unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_get_object_missing_and_malformed() {
        let mut storage = MemoryStorage::new();

        assert_eq!(get_object::<_, Profile>(&storage, "absent"), None);

        storage.set_item("bad", "{not json").unwrap();
        assert_eq!(get_object::<_, Profile>(&storage, "bad"), None);
    }

    #[test]
    fn test_set_multiple_and_get_multiple() {
        let mut storage = MemoryStorage::new();

        assert!(set_multiple(&mut storage, &[("a", "1"), ("b", "2")]));

        let values = get_multiple(&storage, &["a", "b", "missing"]);
        assert_eq!(values["a"], Some("1".to_string()));
        assert_eq!(values["b"], Some("2".to_string()));
        assert_eq!(values["missing"], None);
    }

    #[test]
    fn test_remove_multiple() {
        let mut storage = MemoryStorage::new();
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        assert!(remove_multiple(&mut storage, &["a", "b", "missing"]));
        assert_eq!(storage.len().unwrap(), 0);
    }

    #[test]
    fn test_batch_continues_past_failing_key() {
        /// Fails writes and removals for one poisoned key only.
        struct Picky {
            inner: MemoryStorage,
        }

        impl StorageAdapter for Picky {
            fn get_item(&self, key: &str) -> Result<Option<String>> {
                self.inner.get_item(key)
            }
            fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
                if key == "poison" {
                    return Err(StorageError::Backend("rejected".to_string()));
                }
                self.inner.set_item(key, value)
            }
            fn remove_item(&mut self, key: &str) -> Result<()> {
                if key == "poison" {
                    return Err(StorageError::Backend("rejected".to_string()));
                }
                self.inner.remove_item(key)
            }
            fn clear(&mut self) -> Result<()> {
                self.inner.clear()
            }
        }

        let mut storage = Picky {
            inner: MemoryStorage::new(),
        };

        // Overall false, but the healthy keys still landed
        assert!(!set_multiple(&mut storage, &[("a", "1"), ("poison", "x"), ("b", "2")]));
        assert_eq!(storage.get_item("a").unwrap(), Some("1".to_string()));
        assert_eq!(storage.get_item("b").unwrap(), Some("2".to_string()));

        assert!(!remove_multiple(&mut storage, &["a", "poison"]));
        assert_eq!(storage.get_item("a").unwrap(), None);
    }
}
