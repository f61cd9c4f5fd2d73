//! End-to-end tests: the real router over a file-backed store, driven the
//! way the extension's relay drives the deployed service.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

use mcpclick_api::{
    app_state::AppState, config_loader::CorsConfig, trace_store::TraceStore,
    trace_store_sqlite::SqliteTraceStore, web::build_api_router,
};

fn build_app(dir: &TempDir) -> Router {
    let store = SqliteTraceStore::open(dir.path().join("traces.db")).expect("open store");
    let store: Arc<Mutex<dyn TraceStore>> = Arc::new(Mutex::new(store));
    build_api_router(Arc::new(AppState::new(store)), &CorsConfig::default())
        .expect("build router")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body")
}

async fn post_traces(app: &Router, payload: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri("/api/traces")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request");
    let response = app.clone().oneshot(req).await.expect("response");
    let status = response.status();
    (status, body_json(response).await)
}

async fn get_traces(app: &Router, uri: &str) -> Value {
    let req = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(req).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn create_then_list_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let app = build_app(&dir);

    let (status, created) = post_traces(
        &app,
        json!([{ "kind": "request", "ts": 1234567890i64, "url": "https://example.com" }]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created[0]["id"], json!(1));
    assert_eq!(created[0]["kind"], json!("request"));
    assert_eq!(created[0]["ts"], json!(1234567890i64));
    assert_eq!(created[0]["url"], json!("https://example.com"));
    assert!(created[0]["method"].is_null());
    assert!(created[0]["headers"].is_null());

    let traces = get_traces(&app, "/api/traces").await;
    let traces = traces.as_array().expect("array");
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0]["url"], json!("https://example.com"));
}

#[tokio::test]
async fn empty_batch_creates_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let app = build_app(&dir);

    let (status, created) = post_traces(&app, json!([])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!([]));

    post_traces(&app, json!([{ "kind": "action", "ts": 7 }])).await;
    let traces = get_traces(&app, "/api/traces").await;
    assert_eq!(traces.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn default_limit_caps_the_listing_at_100() {
    let dir = TempDir::new().expect("temp dir");
    let app = build_app(&dir);

    let batch: Vec<Value> = (0..120)
        .map(|i| json!({ "kind": "request", "ts": i }))
        .collect();
    let (status, created) = post_traces(&app, Value::Array(batch)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.as_array().map(Vec::len), Some(120));

    let traces = get_traces(&app, "/api/traces").await;
    let traces = traces.as_array().expect("array");
    assert_eq!(traces.len(), 100);
    assert_eq!(traces[0]["id"], json!(1));
    assert_eq!(traces[99]["id"], json!(100));

    let tail = get_traces(&app, "/api/traces?skip=100").await;
    assert_eq!(tail.as_array().map(Vec::len), Some(20));

    let beyond = get_traces(&app, "/api/traces?skip=200").await;
    assert_eq!(beyond, json!([]));
}

#[tokio::test]
async fn traces_survive_across_batches_in_creation_order() {
    let dir = TempDir::new().expect("temp dir");
    let app = build_app(&dir);

    post_traces(
        &app,
        json!([
            { "kind": "request", "ts": 1, "requestId": "r1", "method": "GET" },
            { "kind": "response", "ts": 2, "requestId": "r1", "status": 200,
              "headers": { "content-type": "text/html" } }
        ]),
    )
    .await;
    post_traces(
        &app,
        json!([{ "kind": "action", "ts": 3, "label": "click", "locator": "#go",
                 "fields": { "x": 10, "y": 20 } }]),
    )
    .await;

    let traces = get_traces(&app, "/api/traces").await;
    let traces = traces.as_array().expect("array");
    assert_eq!(traces.len(), 3);
    assert_eq!(traces[0]["requestId"], json!("r1"));
    assert_eq!(traces[1]["status"], json!(200));
    assert_eq!(traces[1]["headers"]["content-type"], json!("text/html"));
    assert_eq!(traces[2]["fields"], json!({ "x": 10, "y": 20 }));
}
