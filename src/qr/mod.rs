//! QR Module
//!
//! Domain records cached for the QR generator and the content payload
//! encodings used when building QR text.

pub mod models;
pub mod payload;

pub use models::{QrCode, QrFormDraft, QrHistoryItem, QrTemplate, TemplateCategory, User};
pub use payload::{ContentPayload, EmailData, SmsData, VCardData, WifiData, WifiSecurity};
