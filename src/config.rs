//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use crate::storage::StorageKind;

/// Default prefix that namespaces TTL-aware cache records.
pub const DEFAULT_CACHE_PREFIX: &str = "cache_";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which storage medium to resolve at construction time
    pub storage: StorageKind,
    /// Prefix applied to every TTL-aware record's storage key
    pub cache_prefix: String,
    /// Backing file for the file adapter, when one is used
    pub file_path: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LOCALSTASH_STORAGE` - Storage kind: local, session, node or memory (default: local)
    /// - `LOCALSTASH_PREFIX` - Cache record key prefix (default: "cache_")
    /// - `LOCALSTASH_FILE` - Path for the file adapter (default: unset)
    pub fn from_env() -> Self {
        Self {
            storage: env::var("LOCALSTASH_STORAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(StorageKind::Local),
            cache_prefix: env::var("LOCALSTASH_PREFIX")
                .ok()
                .unwrap_or_else(|| DEFAULT_CACHE_PREFIX.to_string()),
            file_path: env::var("LOCALSTASH_FILE").ok(),
        }
    }

    /// Returns a Config using the given storage kind and default everything else.
    pub fn with_storage(storage: StorageKind) -> Self {
        Self {
            storage,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageKind::Local,
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            file_path: None,
        }
    }
}
