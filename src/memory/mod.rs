//! Memory Module
//!
//! QR-aware layer over the cache engine: the typed cache service, its TTL
//! classes, and the settings-aware state container used by the API.

mod service;
mod settings;
mod store;
mod ttl;

pub use service::{MemoryService, DEFAULT_SEARCH_LIMIT};
pub use settings::{CacheSettings, SettingsFile, SettingsUpdate};
pub use store::MemoryStore;
pub use ttl::TtlClass;
