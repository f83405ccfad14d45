//! Cache Module
//!
//! Provides the TTL-aware key-value layer over a selected storage adapter,
//! with lazy expiration and an in-process active key registry.

mod record;
mod store;


// Re-export public types
pub use record::{current_timestamp_ms, CacheRecord, TimeUnit};
pub use store::Cache;
