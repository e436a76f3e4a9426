#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use reelgen_api::config::{GenerationConfig, ServerConfig};
use reelgen_api::router::build_app_router;
use reelgen_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a fast mock generator.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and 20-40 ms simulated render delays.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        generation: GenerationConfig {
            min_delay_ms: 20,
            max_delay_ms: 40,
            max_concurrency: 4,
            failure_rate: 0.0,
        },
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// and return the state alongside it so tests can inspect the store.
pub fn build_test_app(config: ServerConfig) -> (Router, AppState) {
    let state = AppState::new(config.clone());
    let app = build_app_router(state.clone(), &config);
    (app, state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Submit a generation request and return the new job id.
pub async fn submit(app: &Router, body: serde_json::Value) -> String {
    let response = post_json(app.clone(), "/api/generate", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["jobId"].as_str().unwrap().to_string()
}

/// Poll `GET /api/generate` until a terminal status, returning every
/// observed snapshot in order.
pub async fn poll_until_terminal(app: &Router, job_id: &str) -> Vec<serde_json::Value> {
    let mut seen = Vec::new();
    for _ in 0..400 {
        let response = get(app.clone(), &format!("/api/generate?jobId={job_id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let status = json["status"].as_str().unwrap().to_string();
        seen.push(json);
        if status == "completed" || status == "failed" {
            return seen;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {job_id} never reached a terminal status");
}
