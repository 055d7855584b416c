//! API integration tests
//!
//! Exercise the router end to end with in-memory storage.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    routing::post,
    Router,
};
use refclass_core::{Catalog, MemoryStorage, Storage, REFERENCE_TYPES};
use refclass_server::{create_router, AppState, Submitter};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;

const CATALOG: &str = r#"[
    {"id": 1, "year": 1972, "authors": "Caffey J", "title": "Shaking infants", "pdf": "1.pdf", "group": "3fa85f64-5717"},
    {"id": 2, "year": 1984, "authors": "Kempe CH, Silverman FN", "title": "Battered child", "doi": "10.1/2", "pdf": "2.pdf", "group": "3fa85f64-5717"},
    {"id": 3, "year": 1994, "authors": "Duhaime AC", "title": "Shaken baby", "pdf": "3.pdf", "group": "3fa85f64-5717"},
    {"id": 4, "year": 2003, "authors": "Geddes JF", "title": "Other cohort", "pdf": "4.pdf", "group": "other"}
]"#;

const Q: &str = "?uuid=3fa85f64-5717";

fn state_with(storage: Arc<dyn Storage>, endpoint: Option<String>) -> Arc<AppState> {
    Arc::new(AppState::new(
        Catalog::from_json(CATALOG).unwrap(),
        storage,
        Submitter::new(endpoint),
    ))
}

fn app() -> Router {
    create_router(state_with(Arc::new(MemoryStorage::new()), None))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// === Browsing ===

#[tokio::test]
async fn test_vocabulary() {
    let (status, body) = send(&app(), Method::GET, "/api/vocabulary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article_type"].as_array().unwrap().len(), 7);
    assert_eq!(body["topic"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_list_is_scoped_to_group() {
    let app = app();
    let (_, body) = send(&app, Method::GET, &format!("/api/references{Q}"), None).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["label"], "#1 - 1972 - Caffey J - Shaking infants");
    assert_eq!(items[0]["active"], true);

    let (_, body) = send(&app, Method::GET, "/api/references", None).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_navigation_is_bounded() {
    let app = app();
    let uri = format!("/api/navigate{Q}");
    let (_, body) = send(&app, Method::POST, &uri, Some(json!({"direction": "prev"}))).await;
    assert_eq!(body["id"], 1);

    let (_, body) = send(&app, Method::POST, &uri, Some(json!({"index": 2}))).await;
    assert_eq!(body["id"], 3);
    assert_eq!(body["info"], "#003 • 1994 • Duhaime AC • \"Shaken baby\" (3 of 3)");

    let (_, body) = send(&app, Method::POST, &uri, Some(json!({"direction": "next"}))).await;
    assert_eq!(body["id"], 3);

    let (_, body) = send(&app, Method::POST, &uri, Some(json!({"index": 9}))).await;
    assert_eq!(body["position"], 3);

    let (_, body) = send(&app, Method::POST, &uri, Some(json!({"direction": "prev"}))).await;
    assert_eq!(body["id"], 2);

    let (status, _) = send(&app, Method::POST, &uri, Some(json!({"direction": "up"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_group_has_no_current_reference() {
    let (status, _) = send(&app(), Method::GET, "/api/current?uuid=nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Editing ===

#[tokio::test]
async fn test_option_toggle_and_validation() {
    let app = app();
    let uri = format!("/api/current/article_type{Q}");
    let book = REFERENCE_TYPES[1];

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"value": book}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article_type"], book);

    let (_, body) = send(&app, Method::PUT, &uri, Some(json!({"value": book}))).await;
    assert_eq!(body["article_type"], Value::Null);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/current/topic{Q}"),
        Some(json!({"value": book})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edits_are_persisted_per_group() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = create_router(state_with(storage.clone(), None));
    send(
        &app,
        Method::PUT,
        &format!("/api/current/motivation{Q}"),
        Some(json!({"text": "discusses retinal haemorrhage"})),
    )
    .await;

    let saved = storage.get("classifications_3fa85f64-5717").unwrap().unwrap();
    let saved: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["1"]["motivation"], "discusses retinal haemorrhage");
    assert!(storage.get("classifications_all").unwrap().is_none());

    // a fresh server over the same storage starts past the classified reference
    let app = create_router(state_with(storage, None));
    let (_, body) = send(&app, Method::GET, &format!("/api/current{Q}"), None).await;
    assert_eq!(body["id"], 2);
}

// === Export / import ===

#[tokio::test]
async fn test_export_download() {
    let app = app();
    let uri = format!("/api/navigate{Q}");
    send(&app, Method::POST, &uri, Some(json!({"direction": "next"}))).await;
    send(
        &app,
        Method::PUT,
        &format!("/api/current/article_type{Q}"),
        Some(json!({"value": REFERENCE_TYPES[0]})),
    )
    .await;

    let request = Request::builder()
        .uri(format!("/api/export{Q}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"classifications_3fa85f64.json\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!([{
            "id": 2,
            "group": "3fa85f64-5717",
            "year": 1984,
            "authors": "Kempe CH, Silverman FN",
            "title": "Battered child",
            "doi": "10.1/2",
            "article_type": REFERENCE_TYPES[0],
            "topic": "",
            "motivation": ""
        }])
    );
}

#[tokio::test]
async fn test_import_merges_and_rejects_malformed() {
    let app = app();
    let uri = format!("/api/import{Q}");

    let (status, body) = send_raw(&app, Method::POST, &uri, "[{\"id\": 1,").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid JSON"));

    let (status, body) = send_raw(
        &app,
        Method::POST,
        &uri,
        r#"[{"id": 1, "motivation": "imported"}, {"motivation": "no id"}]"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["applied"], 1);
    assert_eq!(body["current"]["motivation"], "imported");
}

// === Submission ===

#[tokio::test]
async fn test_submit_reports_transport_failure() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = create_router(state_with(
        storage.clone(),
        Some("http://127.0.0.1:1/collect".to_string()),
    ));
    send(
        &app,
        Method::PUT,
        &format!("/api/current/motivation{Q}"),
        Some(json!({"text": "local only"})),
    )
    .await;

    let (status, body) = send(&app, Method::POST, &format!("/api/submit{Q}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_error"], true);
    assert_eq!(body["message"], "❌ Failed to save");

    let saved = storage.get("classifications_3fa85f64-5717").unwrap().unwrap();
    assert!(saved.contains("local only"));
}

#[tokio::test]
async fn test_submit_posts_payload_and_ignores_response_status() {
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
    let collector = Router::new().route(
        "/collect",
        post(move |body: String| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(serde_json::from_str(&body).unwrap_or(Value::Null));
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, collector).await.unwrap();
    });

    let app = create_router(state_with(
        Arc::new(MemoryStorage::new()),
        Some(format!("http://{addr}/collect")),
    ));
    send(
        &app,
        Method::PUT,
        &format!("/api/current/motivation{Q}"),
        Some(json!({"text": "to the sheet"})),
    )
    .await;

    let (_, body) = send(&app, Method::POST, &format!("/api/submit{Q}"), None).await;
    assert_eq!(body["is_error"], false);
    assert_eq!(body["message"], "✅ Saved successfully");

    let received = rx.recv().await.unwrap();
    assert_eq!(received["uuid"], "3fa85f64-5717");
    assert_eq!(received["entries"][0]["id"], 1);
    assert_eq!(received["entries"][0]["motivation"], "to the sheet");
    assert!(received["entries"][0].get("group").is_none());
}
