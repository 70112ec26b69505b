//! API Handlers
//!
//! HTTP request handlers for each QR cache endpoint. Every handler takes the
//! write lock for its whole operation, since reads update access statistics.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::cache::{CacheInfo, ValidationReport};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::memory::{
    CacheSettings, MemoryStore, SettingsFile, SettingsUpdate, DEFAULT_SEARCH_LIMIT,
};
use crate::models::{
    validate_qr_codes, validate_templates, ClearQuery, FormQuery, HealthResponse, HistoryQuery,
    ImportResponse, PayloadResponse, RemovedResponse, SearchQuery, StatsResponse,
    StoreFormRequest, StoreHistoryRequest, StoreQrRequest, StoredResponse, TemplateSearchQuery,
};
use crate::qr::{ContentPayload, QrCode, QrFormDraft, QrHistoryItem, QrTemplate, User};

/// Application state shared across all handlers and the cleanup task.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache state container
    pub store: Arc<RwLock<MemoryStore>>,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Saved settings win; otherwise the cache is sized from `MAX_ENTRIES`.
    pub fn from_config(config: &Config) -> Self {
        let settings_file = match &config.settings_path {
            Some(path) => SettingsFile::new(path),
            None => SettingsFile::in_memory(),
        };
        let fallback = CacheSettings {
            max_cache_size: config.max_entries,
            ..Default::default()
        };
        Self::new(MemoryStore::load(settings_file, fallback))
    }
}

fn found<T>(value: Option<T>, what: impl Into<String>) -> Result<Json<T>> {
    value.map(Json).ok_or_else(|| CacheError::NotFound(what.into()))
}

// == QR Codes ==

/// Handler for PUT /qr
pub async fn store_qr_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreQrRequest>,
) -> Result<Json<StoredResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut store = state.store.write().await;
    store.cache_qr_code(&req.qr, req.ttl)?;

    Ok(Json(StoredResponse::new("QR codes", 1, store.is_enabled())))
}

/// Handler for GET /qr/:id
pub async fn get_qr_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QrCode>> {
    let mut store = state.store.write().await;
    found(store.get_cached_qr_code(&id), format!("QR code {}", id))
}

/// Handler for POST /qr/bulk
pub async fn bulk_qr_handler(
    State(state): State<AppState>,
    Json(qrs): Json<Vec<QrCode>>,
) -> Result<Json<StoredResponse>> {
    if let Some(error_msg) = validate_qr_codes(&qrs) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut store = state.store.write().await;
    store.bulk_cache_qr_codes(&qrs)?;

    Ok(Json(StoredResponse::new("QR codes", qrs.len(), store.is_enabled())))
}

// == History ==

/// Handler for PUT /history
pub async fn store_history_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreHistoryRequest>,
) -> Result<Json<StoredResponse>> {
    let mut store = state.store.write().await;
    store.cache_qr_history(&req.history, req.user_id)?;

    Ok(Json(StoredResponse::new(
        "history items",
        req.history.len(),
        store.is_enabled(),
    )))
}

/// Handler for GET /history
pub async fn get_history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<QrHistoryItem>>> {
    let mut store = state.store.write().await;
    found(store.get_cached_qr_history(query.user_id), "QR history")
}

// == Form Drafts ==

/// Handler for PUT /forms
pub async fn store_form_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreFormRequest>,
) -> Result<Json<StoredResponse>> {
    let mut store = state.store.write().await;
    store.cache_form_data(&req.form, req.session_id.as_deref())?;

    Ok(Json(StoredResponse::new("form drafts", 1, store.is_enabled())))
}

/// Handler for GET /forms
pub async fn get_form_handler(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<Json<QrFormDraft>> {
    let mut store = state.store.write().await;
    found(
        store.get_cached_form_data(query.session_id.as_deref()),
        "Form draft",
    )
}

// == Templates ==

/// Handler for PUT /templates
pub async fn store_templates_handler(
    State(state): State<AppState>,
    Json(templates): Json<Vec<QrTemplate>>,
) -> Result<Json<StoredResponse>> {
    if let Some(error_msg) = validate_templates(&templates) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut store = state.store.write().await;
    store.cache_templates(&templates)?;

    Ok(Json(StoredResponse::new(
        "templates",
        templates.len(),
        store.is_enabled(),
    )))
}

/// Handler for GET /templates
pub async fn get_templates_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<QrTemplate>>> {
    let mut store = state.store.write().await;
    found(store.get_cached_templates(), "Templates")
}

/// Handler for GET /templates/:id
pub async fn get_template_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QrTemplate>> {
    let mut store = state.store.write().await;
    found(store.get_cached_template(&id), format!("Template {}", id))
}

/// Handler for POST /templates/bulk
pub async fn bulk_templates_handler(
    State(state): State<AppState>,
    Json(templates): Json<Vec<QrTemplate>>,
) -> Result<Json<StoredResponse>> {
    if let Some(error_msg) = validate_templates(&templates) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut store = state.store.write().await;
    store.bulk_cache_templates(&templates)?;

    Ok(Json(StoredResponse::new(
        "templates",
        templates.len(),
        store.is_enabled(),
    )))
}

// == Users ==

/// Handler for PUT /users
///
/// The stored user also becomes the current user.
pub async fn store_user_handler(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<Json<StoredResponse>> {
    let mut store = state.store.write().await;
    store.cache_user(&user)?;

    Ok(Json(StoredResponse::new("users", 1, store.is_enabled())))
}

/// Handler for GET /users/current
pub async fn get_current_user_handler(State(state): State<AppState>) -> Result<Json<User>> {
    let mut store = state.store.write().await;
    found(store.get_cached_user(None), "Current user")
}

/// Handler for GET /users/:id
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>> {
    let mut store = state.store.write().await;
    found(store.get_cached_user(Some(id)), format!("User {}", id))
}

// == Search ==

/// Handler for GET /search/qr
pub async fn search_qr_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<QrCode>> {
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let mut store = state.store.write().await;
    Json(store.search_cached_qr_codes(&query.q, limit))
}

/// Handler for GET /search/templates
pub async fn search_templates_handler(
    State(state): State<AppState>,
    Query(query): Query<TemplateSearchQuery>,
) -> Json<Vec<QrTemplate>> {
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let mut store = state.store.write().await;
    Json(store.search_cached_templates(&query.q, query.category, limit))
}

// == Cache Management ==

/// Handler for DELETE /cache
///
/// Removes keys matching `pattern` (a regex), or everything when absent.
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    Query(query): Query<ClearQuery>,
) -> Result<Json<RemovedResponse>> {
    let mut store = state.store.write().await;
    let removed = store.clear_cache(query.pattern.as_deref())?;
    Ok(Json(RemovedResponse { removed }))
}

/// Handler for POST /cache/sweep
pub async fn sweep_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let mut store = state.store.write().await;
    Json(RemovedResponse {
        removed: store.clear_expired_entries(),
    })
}

/// Handler for POST /cache/validate
pub async fn validate_handler(State(state): State<AppState>) -> Json<ValidationReport> {
    let mut store = state.store.write().await;
    Json(store.validate_cache())
}

/// Handler for GET /cache/info
pub async fn info_handler(State(state): State<AppState>) -> Json<CacheInfo> {
    let store = state.store.read().await;
    Json(store.cache_info())
}

/// Handler for GET /cache/export
///
/// The snapshot is already JSON text, so it is sent as-is.
pub async fn export_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let store = state.store.read().await;
    let blob = store.export_cache()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], blob))
}

/// Handler for POST /cache/import
///
/// Takes the raw snapshot text; a rejected snapshot answers 400 and leaves
/// the cache unchanged.
pub async fn import_handler(
    State(state): State<AppState>,
    body: String,
) -> (StatusCode, Json<ImportResponse>) {
    let mut store = state.store.write().await;
    let imported = store.import_cache(&body);
    let status = if imported {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(ImportResponse { imported }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.read().await;
    Json(StatsResponse::from(store.cache_stats()))
}

// == Settings ==

/// Handler for GET /settings
pub async fn get_settings_handler(State(state): State<AppState>) -> Json<CacheSettings> {
    let store = state.store.read().await;
    Json(store.settings().clone())
}

/// Handler for PUT /settings
pub async fn update_settings_handler(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Json<CacheSettings> {
    let mut store = state.store.write().await;
    Json(store.update_settings(update))
}

// == Misc ==

/// Handler for POST /payload
///
/// Renders structured content into the text a QR code would carry.
pub async fn payload_handler(Json(payload): Json<ContentPayload>) -> Json<PayloadResponse> {
    Json(PayloadResponse {
        content: payload.encode(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
