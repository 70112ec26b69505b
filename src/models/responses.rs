//! Response DTOs for the QR cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for every store endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StoredResponse {
    /// Success message
    pub message: String,
    /// Number of records handed to the cache
    pub stored: usize,
    /// False when caching is disabled and the write was ignored
    pub cached: bool,
}

impl StoredResponse {
    pub fn new(what: &str, stored: usize, cached: bool) -> Self {
        let message = if cached {
            format!("Cached {} {}", stored, what)
        } else {
            format!("Caching disabled, {} {} not cached", stored, what)
        };
        Self {
            message,
            stored,
            cached,
        }
    }
}

/// Response body for clear and sweep endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    /// Number of entries removed
    pub removed: usize,
}

/// Response body for POST /cache/import
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub imported: bool,
}

/// Response body for POST /payload
#[derive(Debug, Clone, Serialize)]
pub struct PayloadResponse {
    pub content: String,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of size-limit evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Estimated bytes held by the cache
    pub memory_usage: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            memory_usage: stats.memory_usage,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_response_messages() {
        let resp = StoredResponse::new("templates", 2, true);
        assert_eq!(resp.message, "Cached 2 templates");

        let resp = StoredResponse::new("QR codes", 1, false);
        assert!(!resp.cached);
        assert!(resp.message.contains("disabled"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            evictions: 5,
            total_entries: 100,
            memory_usage: 4096,
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.memory_usage, 4096);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
