//! Cache Module
//!
//! Provides in-memory caching of JSON values with TTL expiration, LRU size
//! limiting and a per-type substring search index.

mod entry;
mod index;
mod lru;
mod snapshot;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use index::SearchIndex;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{BulkEntry, BulkGetItem, CacheInfo, CacheStore, ValidationReport};
