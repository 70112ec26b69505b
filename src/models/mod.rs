//! Request and Response models for the QR cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    validate_qr_codes, validate_templates, ClearQuery, FormQuery, HistoryQuery, SearchQuery,
    StoreFormRequest, StoreHistoryRequest, StoreQrRequest, TemplateSearchQuery,
};
pub use responses::{
    HealthResponse, ImportResponse, PayloadResponse, RemovedResponse, StatsResponse,
    StoredResponse,
};
