//! Safe Storage Module
//!
//! Decorates any adapter with uniform error handling: every operation
//! catches the inner error, logs it, and returns a safe default instead of
//! propagating. Downstream callers never see a raw storage failure.

use tracing::{error, warn};

use crate::error::{Result, StorageError};
use crate::storage::StorageAdapter;

// == Safe Storage ==
/// Error-absorbing wrapper around a storage adapter.
///
/// Reads degrade to `None`, writes and removals report plain `bool`
/// success, and `clear` becomes a best-effort no-op on failure. Quota
/// exhaustion gets its own log line so full media are distinguishable from
/// other backend failures.
#[derive(Debug)]
pub struct SafeStorage<S> {
    inner: S,
}

impl<S: StorageAdapter> SafeStorage<S> {
    /// Wraps an adapter in the error-absorbing surface.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Consumes the wrapper, returning the underlying adapter.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Retrieves a value, or `None` on absence or failure.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.inner.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read storage item");
                None
            }
        }
    }

    /// Stores a value, returning false on failure.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match self.inner.set_item(key, value) {
            Ok(()) => true,
            Err(StorageError::QuotaExceeded(msg)) => {
                error!(key, %msg, "storage is full, value not written");
                false
            }
            Err(e) => {
                warn!(key, error = %e, "failed to write storage item");
                false
            }
        }
    }

    /// Removes a value, returning false on failure. Absent keys succeed.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.inner.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "failed to remove storage item");
                false
            }
        }
    }

    /// Clears the medium, returning false on failure.
    pub fn clear_all(&mut self) -> bool {
        match self.inner.clear() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to clear storage");
                false
            }
        }
    }

    /// Returns true if a value exists under `key`, false on absence or failure.
    pub fn has(&self, key: &str) -> bool {
        match self.inner.contains(key) {
            Ok(present) => present,
            Err(e) => {
                warn!(key, error = %e, "failed to check storage item");
                false
            }
        }
    }
}

// The wrapper is itself an adapter, so bulk utilities and the cache layer
// run over it unchanged. Every operation is infallible by construction.
impl<S: StorageAdapter> StorageAdapter for SafeStorage<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.set(key, value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.clear_all();
        Ok(())
    }

    fn key_at(&self, index: usize) -> Result<Option<String>> {
        match self.inner.key_at(index) {
            Ok(key) => Ok(key),
            Err(e) => {
                warn!(index, error = %e, "failed to read storage key by index");
                Ok(None)
            }
        }
    }

    fn len(&self) -> Result<usize> {
        match self.inner.len() {
            Ok(count) => Ok(count),
            Err(e) => {
                warn!(error = %e, "failed to read storage length");
                Ok(0)
            }
        }
    }

    fn supports_enumeration(&self) -> bool {
        self.inner.supports_enumeration()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.has(key))
    }
}
