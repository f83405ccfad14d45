//! Localstash - A client-side key-value cache over pluggable storage
//!
//! Provides a uniform storage capability (in-memory, file-backed or
//! host-provided), a TTL-aware cache layer with lazy expiration, a cookie
//! helper and bulk storage utilities. Every public operation is total:
//! failures are logged via `tracing` and collapse to safe defaults.

pub mod cache;
pub mod config;
pub mod cookie;
pub mod error;
pub mod storage;

pub use cache::{Cache, CacheRecord, TimeUnit};
pub use config::Config;
pub use cookie::{CookieJar, CookieSource, MemoryCookies};
pub use error::{Result, StorageError};
pub use storage::{
    all_keys, get_multiple, get_object, remove_multiple, select_storage, set_multiple,
    set_object, storage_usage, FileStorage, MemoryStorage, SafeStorage, SharedMemoryStorage,
    StorageAdapter, StorageKind,
};
