//! API Routes
//!
//! Configures the Axum router with all QR cache endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::*;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/qr", put(store_qr_handler))
        .route("/qr/bulk", post(bulk_qr_handler))
        .route("/qr/:id", get(get_qr_handler))
        .route(
            "/history",
            put(store_history_handler).get(get_history_handler),
        )
        .route("/forms", put(store_form_handler).get(get_form_handler))
        .route(
            "/templates",
            put(store_templates_handler).get(get_templates_handler),
        )
        .route("/templates/bulk", post(bulk_templates_handler))
        .route("/templates/:id", get(get_template_handler))
        .route("/users", put(store_user_handler))
        .route("/users/current", get(get_current_user_handler))
        .route("/users/:id", get(get_user_handler))
        .route("/search/qr", get(search_qr_handler))
        .route("/search/templates", get(search_templates_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/sweep", post(sweep_handler))
        .route("/cache/validate", post(validate_handler))
        .route("/cache/info", get(info_handler))
        .route("/cache/export", get(export_handler))
        .route("/cache/import", post(import_handler))
        .route(
            "/settings",
            get(get_settings_handler).put(update_settings_handler),
        )
        .route("/payload", post(payload_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{CacheSettings, MemoryStore, SettingsFile};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let store = MemoryStore::new(CacheSettings::default(), SettingsFile::in_memory());
        create_router(AppState::new(store))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_store_qr_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/qr")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"id":"1","content":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_current_user_not_shadowed_by_id_route() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users/current")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Matched the literal route, so no path parse failure
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_qr_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/qr/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
