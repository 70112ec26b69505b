//! QR Cache - an in-memory cache service for a QR code generator
//!
//! Caches QR codes, history, templates, form drafts and user profiles with
//! per-type TTLs, an LRU size limit and a substring search index.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod qr;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use memory::MemoryStore;
pub use tasks::spawn_cleanup_task;
