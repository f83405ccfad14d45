//! Storage Selection Module
//!
//! Resolves the adapter appropriate to the current runtime. Host-provided
//! backends are probed with a sentinel write before being trusted; anything
//! else resolves to a fresh in-memory adapter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{MemoryStorage, SafeStorage, StorageAdapter};

/// Sentinel key written and removed when probing a backend's health.
const PROBE_KEY: &str = "__storage_probe__";

// == Storage Kind ==
/// The storage media a cache can be asked to resolve.
///
/// Without a host-provided backend every kind resolves to an in-memory
/// adapter; the kinds stay distinct so callers can express intent and so a
/// host backend can be routed to the kind it stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Durable, origin-scoped storage (browser localStorage or a host stand-in)
    Local,
    /// Session-scoped storage
    Session,
    /// Process-lifetime storage for non-browser runtimes
    Node,
    /// Explicitly memory-only storage
    Memory,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageKind::Local => "local",
            StorageKind::Session => "session",
            StorageKind::Node => "node",
            StorageKind::Memory => "memory",
        };
        f.write_str(name)
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(StorageKind::Local),
            "session" => Ok(StorageKind::Session),
            "node" => Ok(StorageKind::Node),
            "memory" => Ok(StorageKind::Memory),
            other => Err(format!("unknown storage kind: {other}")),
        }
    }
}

// == Probe ==
/// Checks that a backend accepts a write and a removal.
///
/// Mirrors the availability test browsers need for disabled or full Web
/// Storage: a medium that exists but rejects writes is unusable.
fn is_storage_available(storage: &mut dyn StorageAdapter) -> bool {
    storage
        .set_item(PROBE_KEY, "1")
        .and_then(|()| storage.remove_item(PROBE_KEY))
        .is_ok()
}

// == Select Storage ==
/// Resolves a storage adapter for `kind`, behind the safe wrapper.
///
/// A host-provided backend is probed first: on success it is used as-is, on
/// failure a warning is logged and a fresh in-memory adapter takes its
/// place. Browsers only need this availability test for their own
/// `local`/`session` media; here the probe extends to injected backends,
/// which are trusted only after accepting a write. Without a host backend,
/// every kind yields a fresh in-memory adapter for this runtime.
pub fn select_storage(
    kind: StorageKind,
    host: Option<Box<dyn StorageAdapter>>,
) -> SafeStorage<Box<dyn StorageAdapter>> {
    let adapter: Box<dyn StorageAdapter> = match host {
        Some(mut backend) => {
            if is_storage_available(backend.as_mut()) {
                debug!(%kind, "using host-provided storage backend");
                backend
            } else {
                warn!(%kind, "host storage backend unavailable, falling back to memory");
                Box::new(MemoryStorage::new())
            }
        }
        None => {
            debug!(%kind, "no host backend, using in-memory storage");
            Box::new(MemoryStorage::new())
        }
    };
    SafeStorage::new(adapter)
}
