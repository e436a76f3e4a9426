//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get, submit};
use serde_json::json;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let (app, _state) = build_test_app(common::test_config());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["jobs"], 0);
    assert_eq!(json["processing"], 0);
}

#[tokio::test]
async fn health_reports_configured_concurrency() {
    let mut config = common::test_config();
    config.generation.max_concurrency = 3;
    let (app, _state) = build_test_app(config);

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["max_concurrency"], 3);
}

#[tokio::test]
async fn health_check_counts_jobs() {
    let (app, _state) = build_test_app(common::test_config());
    submit(&app, json!({ "prompt": "counting sheep" })).await;
    submit(&app, json!({ "prompt": "counting stars" })).await;

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["jobs"], 2);
}

#[tokio::test]
async fn health_reports_draining_after_shutdown() {
    let (app, state) = build_test_app(common::test_config());
    state
        .worker
        .shutdown(std::time::Duration::from_millis(10))
        .await;

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["status"], "draining");
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _state) = build_test_app(common::test_config());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let (app, _state) = build_test_app(common::test_config());
    let response = get(app, "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let (app, _state) = build_test_app(common::test_config());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/generate")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    let allow_origin = headers
        .get("access-control-allow-origin")
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "http://localhost:5173");

    let allow_methods = headers
        .get("access-control-allow-methods")
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(
        allow_methods.contains("POST"),
        "Allow-Methods should contain POST, got: {allow_methods}"
    );
}
