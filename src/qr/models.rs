//! QR domain records
//!
//! The records the cache holds for the QR generator: generated codes, history
//! items, style templates, form drafts and user profiles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user profile as returned by the auth API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// A generated QR code record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub content_type: Option<String>,
    /// ISO 8601 creation time
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl QrCode {
    /// Content type used for indexing; untyped codes count as plain text.
    pub fn content_type_or_text(&self) -> &str {
        self.content_type.as_deref().unwrap_or("text")
    }
}

/// A QR code with generation history metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrHistoryItem {
    #[serde(flatten)]
    pub qr: QrCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_used: Option<String>,
    /// Generation time in milliseconds
    #[serde(default)]
    pub generation_time: u64,
    /// File size in bytes
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_downloaded: Option<String>,
}

/// Template grouping shown in the template picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Business,
    Personal,
    Social,
    Marketing,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Business => "business",
            TemplateCategory::Personal => "personal",
            TemplateCategory::Social => "social",
            TemplateCategory::Marketing => "marketing",
        }
    }
}

/// A reusable style preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: QrFormDraft,
    pub category: TemplateCategory,
}

/// An in-progress generator form. Every field is optional; fields this type
/// does not know about are kept in `extra` so drafts survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QrFormDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_correction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_px: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounded: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_style: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
