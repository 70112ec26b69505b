//! Snapshot Module
//!
//! JSON shapes used by whole-cache export and import:
//! `{ cache: [[key, entry], ...], searchIndex: {"type:term": [ids]}, stats, timestamp }`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};

/// Borrowed view of the cache written by export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotOut<'a> {
    pub cache: Vec<(&'a str, &'a CacheEntry)>,
    pub search_index: BTreeMap<String, Vec<String>>,
    pub stats: CacheStats,
    pub timestamp: u64,
}

/// Owned snapshot read by import.
///
/// Only `cache` is checked for shape. `searchIndex` is taken as raw JSON and
/// filtered when the index is rebuilt. Stats in the blob are ignored so local
/// hit and miss counters survive an import.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotIn {
    pub cache: Vec<(String, CacheEntry)>,
    #[serde(default)]
    pub search_index: Value,
}
