//! Search Index Module
//!
//! Inverted index from lowercased terms to entity IDs, namespaced by entity
//! type. Terms are indexed verbatim (no word splitting) and a search matches
//! every term that contains the query.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde_json::Value;

// == Search Index ==
/// Two-level inverted index: entity type -> term -> IDs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SearchIndex {
    postings: HashMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Adds `id` to the posting set of every lowercased term under `kind`.
    ///
    /// Postings are only added. Overwritten, evicted and expired records keep
    /// their old terms until a full clear or import replaces the index.
    pub fn insert<S: AsRef<str>>(&mut self, kind: &str, id: &str, terms: &[S]) {
        let terms_for_kind = self.postings.entry(kind.to_string()).or_default();
        for term in terms {
            terms_for_kind
                .entry(term.as_ref().to_lowercase())
                .or_default()
                .insert(id.to_string());
        }
    }

    // == Search ==
    /// Returns up to `limit` IDs indexed under `kind` whose term contains `query`.
    ///
    /// Matching is case-insensitive. Terms are visited in sorted order and the
    /// first occurrence of an ID fixes its position in the result.
    pub fn search(&self, kind: &str, query: &str, limit: usize) -> Vec<String> {
        let Some(terms) = self.postings.get(kind) else {
            return Vec::new();
        };

        let needle = query.to_lowercase();
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for (term, ids) in terms {
            if !term.contains(&needle) {
                continue;
            }
            for id in ids {
                if results.len() >= limit {
                    return results;
                }
                if seen.insert(id.as_str()) {
                    results.push(id.clone());
                }
            }
        }

        results
    }

    /// Drops every posting.
    pub fn clear(&mut self) {
        self.postings.clear();
    }

    /// Number of distinct (type, term) postings.
    pub fn len(&self) -> usize {
        self.postings.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Flat Form ==
    /// Flattens the index into `"type:term" -> [ids]` form for export.
    pub fn to_flat(&self) -> BTreeMap<String, Vec<String>> {
        let mut flat = BTreeMap::new();
        for (kind, terms) in &self.postings {
            for (term, ids) in terms {
                flat.insert(format!("{kind}:{term}"), ids.iter().cloned().collect());
            }
        }
        flat
    }

    /// Rebuilds an index from its flat JSON form.
    ///
    /// Keys are split on the first `:`; keys without one are skipped. Only
    /// postings that are arrays are kept, and only their string IDs. Anything
    /// other than an object yields an empty index.
    pub fn from_flat(flat: &Value) -> Self {
        let mut index = Self::new();
        let Some(flat) = flat.as_object() else {
            return index;
        };

        for (key, ids) in flat {
            let (Some((kind, term)), Some(ids)) = (key.split_once(':'), ids.as_array()) else {
                continue;
            };
            let terms = index.postings.entry(kind.to_string()).or_default();
            terms
                .entry(term.to_lowercase())
                .or_default()
                .extend(ids.iter().filter_map(Value::as_str).map(str::to_string));
        }
        index
    }
}
