//! Cache Record Module
//!
//! Defines the serialized record wrapping every TTL-aware cache value.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Time Unit ==
/// Granularity for TTL durations and remaining-time queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Minutes
    #[default]
    Minutes,
    /// Seconds
    Seconds,
}

impl TimeUnit {
    /// Converts a duration in this unit to milliseconds.
    pub fn to_millis(self, duration: u64) -> u64 {
        match self {
            TimeUnit::Minutes => duration * 60 * 1000,
            TimeUnit::Seconds => duration * 1000,
        }
    }

    /// Converts milliseconds to a whole duration in this unit, flooring.
    pub fn from_millis(self, millis: u64) -> u64 {
        match self {
            TimeUnit::Minutes => millis / (60 * 1000),
            TimeUnit::Seconds => millis / 1000,
        }
    }
}

// == Cache Record ==
/// The persisted shape of a cached value.
///
/// Serialized as `{"value": ..., "expire": <ms since epoch>}` with
/// `expire == 0` meaning the record never expires. The zero sentinel (over
/// an absent field) is the wire format; records written by one process are
/// readable by the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The stored value, as arbitrary JSON
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds), 0 = no expiration
    pub expire: u64,
}

impl CacheRecord {
    /// Creates a record expiring at `expire` milliseconds since the epoch.
    pub fn new(value: Value, expire: u64) -> Self {
        Self { value, expire }
    }

    /// Checks if the record has expired.
    ///
    /// A record with `expire == 0` never expires. Otherwise the record is
    /// expired once the current time is strictly past the expiration
    /// timestamp.
    pub fn is_expired(&self) -> bool {
        self.expire > 0 && current_timestamp_ms() > self.expire
    }

    /// Returns remaining lifetime in milliseconds.
    ///
    /// 0 for records without expiration and for records already expired.
    pub fn remaining_ms(&self) -> u64 {
        if self.expire == 0 {
            return 0;
        }
        self.expire.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
