//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint group.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use qr_cache::{
    api::create_router,
    memory::{CacheSettings, MemoryStore, SettingsFile},
    AppState,
};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let store = MemoryStore::new(CacheSettings::default(), SettingsFile::in_memory());
    create_router(AppState::new(store))
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const OCEAN_TEMPLATES: &str = r#"[
    {"id": "t1", "name": "Ocean Blue", "description": "Cool blue tones", "category": "business"},
    {"id": "t2", "name": "Ocean Green", "description": "Sea green", "category": "social"}
]"#;

// == QR Code Endpoint Tests ==

#[tokio::test]
async fn test_store_and_get_qr_code() {
    let app = create_test_app();

    let store_response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/qr",
            r#"{"id":"1","content":"https://example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(store_response.status(), StatusCode::OK);
    let json = body_to_json(store_response.into_body()).await;
    assert_eq!(json["cached"], true);

    let get_response = app.oneshot(empty_request("GET", "/qr/1")).await.unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["id"], "1");
    assert_eq!(json["content"], "https://example.com");
}

#[tokio::test]
async fn test_get_qr_code_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(empty_request("GET", "/qr/nonexistent"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_qr_ttl_expiration_via_api() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/qr",
            r#"{"id":"short","content":"bye","ttl":50}"#,
        ))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(120)).await;

    let response = app.oneshot(empty_request("GET", "/qr/short")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_qr_codes_are_not_searchable() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/qr/bulk",
            r#"[{"id":"a","content":"alpha"},{"id":"b","content":"beta"}]"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/qr/b"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request("GET", "/search/qr?q=alpha"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

// == History, Form and User Endpoint Tests ==

#[tokio::test]
async fn test_history_per_user() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/history",
            r#"{"user_id": 7, "history": [{"id":"1","content":"x","generation_time":12,"file_size":900,"downloads":3}]}"#,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/history?user_id=7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json[0]["downloads"], 3);

    let response = app
        .oneshot(empty_request("GET", "/history"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_form_draft_per_session() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/forms",
            r##"{"session_id": "abc", "form": {"content": "draft", "foreground": "#000"}}"##,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/forms?session_id=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["content"], "draft");
    assert_eq!(json["foreground"], "#000");

    let response = app.oneshot(empty_request("GET", "/forms")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_becomes_current() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/users",
            r#"{"id": 42, "username": "ada", "is_admin": true}"#,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/users/42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request("GET", "/users/current"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["username"], "ada");
}

// == Template and Search Endpoint Tests ==

#[tokio::test]
async fn test_template_search() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/templates", OCEAN_TEMPLATES))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/search/templates?q=ocean"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/search/templates?q=blue"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], "t1");

    let response = app
        .oneshot(empty_request(
            "GET",
            "/search/templates?q=ocean&category=social",
        ))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], "t2");
}

#[tokio::test]
async fn test_get_all_and_single_template() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("PUT", "/templates", OCEAN_TEMPLATES))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/templates"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let response = app
        .oneshot(empty_request("GET", "/templates/t2"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["name"], "Ocean Green");
}

#[tokio::test]
async fn test_qr_search_by_content_type() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/qr",
            r#"{"id":"w","content":"WIFI:T:WPA;S:home;P:pw;;","content_type":"wifi"}"#,
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(empty_request("GET", "/search/qr?q=WIFI&limit=5"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json[0]["id"], "w");
}

// == Cache Management Endpoint Tests ==

#[tokio::test]
async fn test_clear_by_pattern() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("PUT", "/qr", r#"{"id":"1","content":"a"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(json_request("PUT", "/templates", OCEAN_TEMPLATES))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/cache?pattern=%5Eqr%3A"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);

    let response = app
        .oneshot(empty_request("GET", "/cache/info"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    let keys = json["keys"].as_array().unwrap();
    assert!(keys.iter().all(|k| !k.as_str().unwrap().starts_with("qr:")));
    assert_eq!(json["size"], 3);
}

#[tokio::test]
async fn test_clear_with_invalid_pattern() {
    let app = create_test_app();

    let response = app
        .oneshot(empty_request("DELETE", "/cache?pattern=%28"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_export_then_import() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("PUT", "/templates", OCEAN_TEMPLATES))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/cache/export"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let blob = body_to_string(response.into_body()).await;

    app.clone()
        .oneshot(empty_request("DELETE", "/cache"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/cache/import", &blob))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["imported"], true);

    let response = app
        .oneshot(empty_request("GET", "/search/templates?q=ocean"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_import_invalid_json() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("PUT", "/qr", r#"{"id":"1","content":"a"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/cache/import", "not json at all"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["imported"], false);

    let response = app.oneshot(empty_request("GET", "/qr/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sweep_and_validate() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/qr",
            r#"{"id":"1","content":"a","ttl":10}"#,
        ))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/cache/sweep"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);

    let response = app
        .oneshot(empty_request("POST", "/cache/validate"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
}

// == Settings Endpoint Tests ==

#[tokio::test]
async fn test_disabled_cache_reads_not_found() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("PUT", "/qr", r#"{"id":"1","content":"a"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/settings", r#"{"cache_enabled": false}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache_enabled"], false);
    assert_eq!(json["auto_cleanup"], true);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/qr/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("GET", "/settings"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache_enabled"], false);
    assert_eq!(json["max_cache_size"], 1000);
}

#[tokio::test]
async fn test_lowering_max_cache_size_evicts() {
    let app = create_test_app();

    for id in ["1", "2", "3"] {
        let body = format!(r#"{{"id":"{}","content":"c"}}"#, id);
        app.clone()
            .oneshot(json_request("PUT", "/qr", &body))
            .await
            .unwrap();
    }

    app.clone()
        .oneshot(json_request("PUT", "/settings", r#"{"max_cache_size": 2}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/stats"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["total_entries"], 2);
    assert_eq!(json["evictions"], 1);

    let response = app.oneshot(empty_request("GET", "/qr/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Payload, Stats and Health Endpoint Tests ==

#[tokio::test]
async fn test_payload_encoding() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/payload",
            r#"{"content_type":"wifi","data":{"ssid":"Home","password":"secret","security":"WPA"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["content"], "WIFI:T:WPA;S:Home;P:secret;H:false;;");

    let response = app
        .oneshot(json_request(
            "POST",
            "/payload",
            r#"{"content_type":"phone","data":"+15550100"}"#,
        ))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["content"], "tel:+15550100");
}

#[tokio::test]
async fn test_stats_track_hits_and_misses() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("PUT", "/qr", r#"{"id":"1","content":"a"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(empty_request("GET", "/qr/1"))
        .await
        .unwrap();
    app.clone()
        .oneshot(empty_request("GET", "/qr/2"))
        .await
        .unwrap();

    let response = app.oneshot(empty_request("GET", "/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 0.001);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("PUT", "/qr", "not valid json"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_empty_id_request() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("PUT", "/qr", r#"{"id":"","content":"a"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("empty"));
}
