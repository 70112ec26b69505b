//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and a per-type search index.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::snapshot::{SnapshotIn, SnapshotOut};
use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats, LruTracker, SearchIndex};
use crate::error::{CacheError, Result};

// == Operation Outputs ==
/// One item of a bulk store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkEntry {
    pub key: String,
    pub data: Value,
    /// TTL in milliseconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

/// One result of a bulk get; `data` is None for missing or expired keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkGetItem {
    pub key: String,
    pub data: Option<Value>,
}

/// Size and sorted key list of the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheInfo {
    pub size: usize,
    pub keys: Vec<String>,
}

/// Outcome of an integrity check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

// == Cache Store ==
/// In-memory cache of JSON values with TTL, LRU size limit and search index.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Inverted index used by searches
    index: SearchIndex,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, 0 = unbounded
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries (0 = unbounded).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            index: SearchIndex::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    /// Returns the configured size limit.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    // == Resize ==
    /// Changes the size limit, evicting least recently used entries if needed.
    ///
    /// Returns the number of entries evicted.
    pub fn set_max_entries(&mut self, max_entries: usize) -> usize {
        self.max_entries = max_entries;
        let mut evicted = 0;
        if max_entries == 0 {
            return evicted;
        }
        while self.entries.len() > max_entries {
            if !self.evict_oldest() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    // == Store ==
    /// Stores a value under `key`, replacing any previous entry entirely.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `data` - The value to store
    /// * `ttl` - Optional TTL in milliseconds (None = never expires)
    pub fn store(&mut self, key: impl Into<String>, data: Value, ttl: Option<u64>) {
        self.store_at(key, data, ttl, current_timestamp_ms());
    }

    /// Same as [`CacheStore::store`] with an explicit current time.
    pub fn store_at(&mut self, key: impl Into<String>, data: Value, ttl: Option<u64>, now: u64) {
        let key = key.into();
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.max_entries > 0 && self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        self.entries
            .insert(key.clone(), CacheEntry::created_at(data, ttl, now));
        self.lru.touch(&key);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None for missing and expired keys; expired entries are removed.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, current_timestamp_ms())
    }

    /// Same as [`CacheStore::get`] with an explicit current time.
    pub fn get_at(&mut self, key: &str, now: u64) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_key(key);
            self.stats.record_miss();
            return None;
        }

        let data = self.entries.get_mut(key).map(|entry| {
            entry.record_access(now);
            entry.data.clone()
        });
        self.stats.record_hit();
        self.lru.touch(key);
        data
    }

    // == Bulk ==
    /// Stores every entry in order.
    pub fn bulk_store(&mut self, entries: Vec<BulkEntry>) {
        let now = current_timestamp_ms();
        for BulkEntry { key, data, ttl } in entries {
            self.store_at(key, data, ttl, now);
        }
    }

    /// Reads every key in order.
    pub fn bulk_get(&mut self, keys: &[String]) -> Vec<BulkGetItem> {
        let now = current_timestamp_ms();
        keys.iter()
            .map(|key| BulkGetItem {
                key: key.clone(),
                data: self.get_at(key, now),
            })
            .collect()
    }

    // == Clear ==
    /// Removes every key matching `pattern`, or everything when no pattern is given.
    ///
    /// The pattern is a regular expression searched anywhere in the key. A
    /// pattern clear leaves the search index alone; searches skip IDs whose
    /// entries are gone. A full clear empties the index too.
    pub fn remove_matching(&mut self, pattern: Option<&str>) -> Result<usize> {
        let Some(pattern) = pattern else {
            let count = self.entries.len();
            self.entries.clear();
            self.index.clear();
            self.lru.clear();
            info!("Cache cleared: removed {} entries", count);
            return Ok(count);
        };

        let regex = Regex::new(pattern).map_err(|e| CacheError::InvalidPattern(e.to_string()))?;
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| regex.is_match(key))
            .cloned()
            .collect();

        for key in &matching {
            self.remove_key(key);
        }

        info!(
            "Cache cleared by pattern '{}': removed {} entries",
            pattern,
            matching.len()
        );
        Ok(matching.len())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.cleanup_expired_at(current_timestamp_ms())
    }

    /// Same as [`CacheStore::cleanup_expired`] with an explicit current time.
    pub fn cleanup_expired_at(&mut self, now: u64) -> usize {
        let expired = self.expired_keys(now);
        for key in &expired {
            self.remove_key(key);
        }
        expired.len()
    }

    // == Search Index ==
    /// Indexes `id` under `kind` for each term.
    pub fn index<S: AsRef<str>>(&mut self, kind: &str, id: &str, terms: &[S]) {
        self.index.insert(kind, id, terms);
    }

    /// Returns up to `limit` IDs of `kind` with a term containing `query`.
    pub fn search(&self, kind: &str, query: &str, limit: usize) -> Vec<String> {
        self.index.search(kind, query, limit)
    }

    // == Validate ==
    /// Checks every entry and deletes the ones that should not be there.
    ///
    /// Expired entries are reported and removed without failing the check;
    /// malformed entries (null data or missing timestamp) fail it.
    pub fn validate(&mut self) -> ValidationReport {
        self.validate_at(current_timestamp_ms())
    }

    /// Same as [`CacheStore::validate`] with an explicit current time.
    pub fn validate_at(&mut self, now: u64) -> ValidationReport {
        let mut errors = Vec::new();
        let mut is_valid = true;

        let expired = self.expired_keys(now);
        if !expired.is_empty() {
            errors.push(format!("Found {} expired cache entries", expired.len()));
            for key in &expired {
                self.remove_key(key);
            }
        }

        let mut malformed: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_malformed())
            .map(|(key, _)| key.clone())
            .collect();
        malformed.sort();

        for key in malformed {
            errors.push(format!("Invalid cache entry structure for key: {key}"));
            self.remove_key(&key);
            is_valid = false;
        }

        if !errors.is_empty() {
            warn!("Cache validation repaired entries: {:?}", errors);
        }

        ValidationReport { is_valid, errors }
    }

    // == Stats ==
    /// Returns current statistics with up-to-date size figures.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len(), self.estimate_memory_usage());
        stats
    }

    /// Returns the entry count and sorted keys.
    pub fn info(&self) -> CacheInfo {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        CacheInfo {
            size: keys.len(),
            keys,
        }
    }

    // == Export / Import ==
    /// Serializes entries, index and stats into a JSON string.
    pub fn export(&self) -> Result<String> {
        let mut cache: Vec<(&str, &CacheEntry)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry))
            .collect();
        cache.sort_by(|a, b| a.0.cmp(b.0));

        let snapshot = SnapshotOut {
            cache,
            search_index: self.index.to_flat(),
            stats: self.stats(),
            timestamp: current_timestamp_ms(),
        };

        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Replaces entries and index with the contents of an exported blob.
    ///
    /// Returns false and leaves the cache untouched when the blob is not a
    /// valid snapshot.
    pub fn import(&mut self, data: &str) -> bool {
        let snapshot: SnapshotIn = match serde_json::from_str(data) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to import cache data: {}", e);
                return false;
            }
        };

        let entries: HashMap<String, CacheEntry> = snapshot.cache.into_iter().collect();

        let mut by_access: Vec<(&String, u64)> = entries
            .iter()
            .map(|(key, entry)| (key, entry.last_accessed))
            .collect();
        by_access.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        self.lru
            .rebuild(by_access.into_iter().map(|(key, _)| key.clone()));

        self.entries = entries;
        self.index = SearchIndex::from_flat(&snapshot.search_index);

        let evicted = self.set_max_entries(self.max_entries);
        info!(
            "Imported {} cache entries ({} evicted by size limit)",
            self.entries.len(),
            evicted
        );
        true
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Internal Helpers ==
    fn remove_key(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
    }

    fn evict_oldest(&mut self) -> bool {
        match self.lru.evict_oldest() {
            Some(key) => {
                self.entries.remove(&key);
                self.stats.record_eviction();
                debug!("Evicted least recently used key '{}'", key);
                true
            }
            None => false,
        }
    }

    fn expired_keys(&self, now: u64) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Rough byte estimate: two bytes per UTF-16 unit of key and serialized entry.
    fn estimate_memory_usage(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, entry)| {
                let serialized = serde_json::to_string(entry).unwrap_or_default();
                (key.encode_utf16().count() + serialized.encode_utf16().count()) * 2
            })
            .sum()
    }
}
