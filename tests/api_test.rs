//! Integration tests for the HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use expense_tracker::adapters::http::{router, AppState};
use expense_tracker::adapters::metrics::{HealthState, MetricsRegistry};
use expense_tracker::adapters::persistence::{CsvRecordFile, DecodeMode};
use expense_tracker::usecases::RecordStore;

struct TestApp {
    _dir: tempfile::TempDir,
    app: Router,
    data_file: PathBuf,
    pages_dir: PathBuf,
    health: Arc<HealthState>,
}

async fn test_app_with(metrics_enabled: bool) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.csv");
    let pages_dir = dir.path().join("pages");
    std::fs::create_dir(&pages_dir).unwrap();
    std::fs::write(pages_dir.join("home.html"), "<h1>Home</h1>").unwrap();
    std::fs::write(
        pages_dir.join("list.html"),
        "<html><body><h1>List</h1></body></html>",
    )
    .unwrap();
    std::fs::write(pages_dir.join("add.html"), "<h1>Add</h1>").unwrap();
    std::fs::write(pages_dir.join("delete.html"), "<h1>Delete</h1>").unwrap();

    let store = Arc::new(RecordStore::new(Arc::new(CsvRecordFile::new(
        &data_file,
        DecodeMode::Strict,
    ))));
    store.load().await.unwrap();

    let health = Arc::new(HealthState::new());
    health.mark_loaded();

    let metrics = metrics_enabled.then(|| Arc::new(MetricsRegistry::new().unwrap()));

    let app = router(AppState {
        store,
        health: Arc::clone(&health),
        metrics,
        pages_dir: Arc::new(pages_dir.clone()),
    });

    TestApp {
        _dir: dir,
        app,
        data_file,
        pages_dir,
        health,
    }
}

async fn test_app() -> TestApp {
    test_app_with(true).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

// ============================================================================
// Records API
// ============================================================================

#[tokio::test]
async fn test_list_empty_is_not_found() {
    let t = test_app().await;

    let (status, body) = send(&t.app, get("/records")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["success"], false);
    assert_eq!(json(&body)["error"], "No records available");
}

#[tokio::test]
async fn test_create_assigns_id_and_ignores_payload_id() {
    let t = test_app().await;

    let (status, body) = send(
        &t.app,
        post_json(
            "/records",
            r#"{"id": 77, "date": "2024-01-01", "description": "groceries", "quantity": 2, "amount": 50}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let created = json(&body);
    assert_eq!(created["id"], 1);
    assert_eq!(created["description"], "groceries");
    assert_eq!(
        std::fs::read_to_string(&t.data_file).unwrap(),
        "1,2024-01-01,groceries,2,50\n"
    );
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let t = test_app().await;

    let (status, body) = send(&t.app, post_json("/records", r#"{"date": "2024-01-01"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["success"], false);

    let (status, _) = send(
        &t.app,
        post_json(
            "/records",
            r#"{"date": "d", "description": "x", "quantity": "two", "amount": 1}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!t.data_file.exists());
}

#[tokio::test]
async fn test_full_scenario_over_http() {
    let t = test_app().await;

    send(
        &t.app,
        post_json(
            "/records",
            r#"{"date": "2024-01-01", "description": "groceries", "quantity": 2, "amount": 50}"#,
        ),
    )
    .await;
    let (_, body) = send(
        &t.app,
        post_json(
            "/records",
            r#"{"date": "2024-01-02", "description": "bus", "quantity": 1, "amount": 10}"#,
        ),
    )
    .await;
    assert_eq!(json(&body)["id"], 2);

    let (status, body) = send(&t.app, get("/total")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Total amount: 60");

    let (status, body) = send(&t.app, delete("/records/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Record with ID 1 has been deleted");

    let (status, body) = send(&t.app, get("/records")).await;
    assert_eq!(status, StatusCode::OK);
    let list = json(&body);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], 2);

    let (status, body) = send(&t.app, get("/records/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json(&body)["error"].as_str().unwrap().contains("not found"));

    let (status, body) = send(&t.app, get("/records/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["description"], "bus");
}

#[tokio::test]
async fn test_invalid_and_missing_ids() {
    let t = test_app().await;

    let (status, body) = send(&t.app, get("/records/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Invalid record ID: abc");

    let (status, _) = send(&t.app, delete("/records/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&t.app, delete("/records/5")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_total_on_empty_store() {
    let t = test_app().await;
    let (status, body) = send(&t.app, get("/total")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Total amount: 0");
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_pages() {
    let t = test_app().await;

    let (status, body) = send(&t.app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>Home</h1>");

    let (status, body) = send(&t.app, get("/list")).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.starts_with("<html><body><h1>List</h1>"));
    assert!(page.ends_with("Total amount: 0</p>\n</body></html>"));

    let (status, body) = send(&t.app, get("/add")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>Add</h1>");

    let (status, body) = send(&t.app, get("/delete")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>Delete</h1>");

    std::fs::remove_file(t.pages_dir.join("add.html")).unwrap();
    let (status, body) = send(&t.app, get("/add")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "Page add.html not found");
}

// ============================================================================
// Health and Metrics
// ============================================================================

#[tokio::test]
async fn test_health_probes() {
    let t = test_app().await;

    let (status, body) = send(&t.app, get("/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let (status, _) = send(&t.app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);

    t.health.mark_shutting_down();
    let (status, _) = send(&t.app, get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_metrics_count_operations() {
    let t = test_app().await;

    send(
        &t.app,
        post_json(
            "/records",
            r#"{"date": "2024-01-01", "description": "tea", "quantity": 1, "amount": 3}"#,
        ),
    )
    .await;
    send(&t.app, delete("/records/9")).await;

    let (status, body) = send(&t.app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("expense_tracker_records_created_total 1"));
    assert!(text.contains("expense_tracker_records_stored 1"));
    let error_line = text
        .lines()
        .find(|line| line.starts_with("expense_tracker_store_errors_total{"))
        .unwrap();
    assert!(error_line.contains(r#"kind="not_found""#));
    assert!(error_line.contains(r#"operation="delete""#));
    assert!(error_line.ends_with(" 1"));
}

#[tokio::test]
async fn test_metrics_disabled() {
    let t = test_app_with(false).await;
    let (status, _) = send(&t.app, get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
