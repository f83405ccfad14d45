//! Storage Module
//!
//! Provides the uniform storage capability and its concrete adapters:
//! in-memory maps, a durable file-backed store, the error-absorbing safe
//! wrapper, runtime selection and bulk utilities.

mod bulk;
mod file;
mod memory;
mod safe;
mod select;

// Re-export public types
pub use bulk::{
    all_keys, get_multiple, get_object, remove_multiple, set_multiple, set_object, storage_usage,
};
pub use file::FileStorage;
pub use memory::{MemoryStorage, SharedMemoryStorage};
pub use safe::SafeStorage;
pub use select::{select_storage, StorageKind};

use crate::error::Result;

// == Storage Adapter Trait ==
/// The minimal capability set every storage medium exposes: string-keyed,
/// string-valued get/set/remove/clear, plus optional enumeration.
///
/// Operations are fallible at this layer. Downstream consumers go through
/// [`SafeStorage`], which collapses failures into logged safe defaults, so
/// adapter implementations are free to report quota and I/O errors honestly.
pub trait StorageAdapter {
    /// Retrieves the value stored under `key`, or `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`. Removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<()>;

    /// Removes every key from the medium.
    fn clear(&mut self) -> Result<()>;

    /// Returns the key at `index`, for adapters that support enumeration.
    ///
    /// The default implementation reports no enumeration capability.
    fn key_at(&self, _index: usize) -> Result<Option<String>> {
        Ok(None)
    }

    /// Returns the number of stored keys, for adapters that support enumeration.
    fn len(&self) -> Result<usize> {
        Ok(0)
    }

    /// Returns true if the medium holds no keys.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns true if this adapter can enumerate its keys via [`key_at`](Self::key_at).
    fn supports_enumeration(&self) -> bool {
        false
    }

    /// Returns true if a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key)?.is_some())
    }
}

// Boxed adapters forward to their contents, so `Box<dyn StorageAdapter>`
// slots into anything generic over the trait.
impl<T: StorageAdapter + ?Sized> StorageAdapter for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn key_at(&self, index: usize) -> Result<Option<String>> {
        (**self).key_at(index)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }

    fn supports_enumeration(&self) -> bool {
        (**self).supports_enumeration()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}
