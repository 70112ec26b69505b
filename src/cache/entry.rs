//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with its JSON payload and access metadata.
///
/// Field names serialize in camelCase so that exported snapshots keep the
/// `{ data, timestamp, ttl, accessCount, lastAccessed }` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The stored value
    #[serde(default)]
    pub data: Value,
    /// Creation timestamp (Unix milliseconds)
    #[serde(default)]
    pub timestamp: u64,
    /// Time to live in milliseconds, None = no expiration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    /// Number of successful reads since the entry was stored
    #[serde(default)]
    pub access_count: u64,
    /// Timestamp of the last successful read (Unix milliseconds)
    #[serde(default)]
    pub last_accessed: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with an explicit creation time.
    ///
    /// # Arguments
    /// * `data` - The value to store
    /// * `ttl_ms` - Optional TTL in milliseconds
    /// * `now` - Creation time in Unix milliseconds
    pub fn created_at(data: Value, ttl_ms: Option<u64>, now: u64) -> Self {
        Self {
            data,
            timestamp: now,
            ttl: ttl_ms,
            access_count: 0,
            last_accessed: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at the given instant.
    ///
    /// An entry expires once strictly more than `ttl` milliseconds have passed
    /// since creation, so a read exactly at `timestamp + ttl` still succeeds.
    /// A TTL of zero is treated as "no expiration".
    pub fn is_expired_at(&self, now: u64) -> bool {
        match self.ttl {
            Some(ttl) if ttl > 0 => now.saturating_sub(self.timestamp) > ttl,
            _ => false,
        }
    }

    // == Record Access ==
    /// Bumps the access counter and last access time.
    pub fn record_access(&mut self, now: u64) {
        self.access_count += 1;
        self.last_accessed = now;
    }

    // == Structure Check ==
    /// Returns true when the entry carries no usable payload or timestamp.
    ///
    /// Only imported entries can end up in this state.
    pub fn is_malformed(&self) -> bool {
        self.data.is_null() || self.timestamp == 0
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
