//! Request DTOs for the QR cache API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::qr::{QrCode, QrFormDraft, QrHistoryItem, QrTemplate, TemplateCategory};

/// Request body for PUT /qr
///
/// The QR record fields sit at the top level next to an optional `ttl`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreQrRequest {
    #[serde(flatten)]
    pub qr: QrCode,
    /// Optional TTL in milliseconds (QR class default when absent)
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl StoreQrRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.qr.id.is_empty() {
            return Some("QR code id cannot be empty".to_string());
        }
        None
    }
}

/// Request body for PUT /history
#[derive(Debug, Clone, Deserialize)]
pub struct StoreHistoryRequest {
    pub history: Vec<QrHistoryItem>,
    #[serde(default)]
    pub user_id: Option<u64>,
}

/// Request body for PUT /forms
#[derive(Debug, Clone, Deserialize)]
pub struct StoreFormRequest {
    pub form: QrFormDraft,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Query string for GET /history
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<u64>,
}

/// Query string for GET /forms
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormQuery {
    pub session_id: Option<String>,
}

/// Query string for GET /search/qr
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

/// Query string for GET /search/templates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateSearchQuery {
    #[serde(default)]
    pub q: String,
    pub category: Option<TemplateCategory>,
    pub limit: Option<usize>,
}

/// Query string for DELETE /cache
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearQuery {
    pub pattern: Option<String>,
}

/// Checks that every template in a batch has an id.
pub fn validate_templates(templates: &[QrTemplate]) -> Option<String> {
    if templates.iter().any(|t| t.id.is_empty()) {
        return Some("Template id cannot be empty".to_string());
    }
    None
}

/// Checks that every QR code in a batch has an id.
pub fn validate_qr_codes(qrs: &[QrCode]) -> Option<String> {
    if qrs.iter().any(|qr| qr.id.is_empty()) {
        return Some("QR code id cannot be empty".to_string());
    }
    None
}
