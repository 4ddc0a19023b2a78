//! Integration tests for `POST /api/v1/call` against local webhook servers.

mod common;

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use common::{body_json, create_method, create_provider, post_json};
use fedits_core::signing::{self, SIGNATURE_HEADER};
use serde_json::{json, Value};

/// Serve a webhook that checks the signature with `secret`, waits `delay_ms`
/// and answers `status` with `body`. Returns the webhook URL.
async fn spawn_hook(secret: &'static str, delay_ms: u64, status: StatusCode, body: Value) -> String {
    let handler = move |headers: HeaderMap, payload: Bytes| {
        let body = body.clone();
        async move {
            let signature = headers
                .get(SIGNATURE_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if !signing::verify(secret.as_bytes(), &payload, signature) {
                return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad signature" })));
            }
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            (status, Json(body))
        }
    };

    let router = Router::new().route("/hook", post(handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/hook")
}

fn call(method: &str) -> Value {
    json!({ "user_ref": "u-42", "method": method, "params": [1] })
}

#[tokio::test]
async fn unknown_method_returns_404() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/v1/call", call("lookup")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Method 'lookup' not found");
}

#[tokio::test]
async fn method_without_providers_returns_503() {
    let app = common::build_test_app();
    create_method(&app, "ping", "concurrent").await;

    let response = post_json(app, "/api/v1/call", call("ping")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "NO_PROVIDER_AVAILABLE");
}

#[tokio::test]
async fn concurrent_call_returns_fastest_envelope() {
    let app = common::build_test_app();
    create_method(&app, "ping", "concurrent").await;
    let slow = spawn_hook("k2", 1_500, StatusCode::OK, json!({ "pong": 2 })).await;
    let fast = spawn_hook("k1", 20, StatusCode::OK, json!({ "pong": 1 })).await;
    create_provider(&app, "slow", &slow, "k2", &["ping"]).await;
    create_provider(&app, "fast", &fast, "k1", &["ping"]).await;

    let response = post_json(app, "/api/v1/call", call("ping")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!({ "provider": "FAST", "version": "9.9.9", "result": { "pong": 1 } })
    );
}

#[tokio::test]
async fn fallback_call_uses_next_provider_after_failure() {
    let app = common::build_test_app();
    create_method(&app, "lookup", "fallback").await;
    let broken = spawn_hook("ka", 0, StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    let working = spawn_hook("kb", 0, StatusCode::OK, json!({ "id": 7 })).await;
    create_provider(&app, "broken", &broken, "ka", &["lookup"]).await;
    create_provider(&app, "working", &working, "kb", &["lookup"]).await;

    let response = post_json(app, "/api/v1/call", call("lookup")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["provider"], "WORKING");
    assert_eq!(json["data"]["result"], json!({ "id": 7 }));
}

#[tokio::test]
async fn fallback_exhaustion_returns_503() {
    let app = common::build_test_app();
    create_method(&app, "lookup", "fallback").await;
    let broken = spawn_hook("ka", 0, StatusCode::BAD_GATEWAY, json!({})).await;
    create_provider(&app, "broken", &broken, "ka", &["lookup"]).await;

    let response = post_json(app, "/api/v1/call", call("lookup")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn concurrent_all_failed_returns_502() {
    let app = common::build_test_app();
    create_method(&app, "ping", "concurrent").await;
    let broken = spawn_hook("ka", 0, StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    create_provider(&app, "broken", &broken, "ka", &["ping"]).await;

    let response = post_json(app, "/api/v1/call", call("ping")).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PROVIDER_ERROR");
    assert_eq!(json["error"], "Provider 'broken' failed to handle the call");
}

#[tokio::test]
async fn empty_user_ref_is_rejected() {
    let app = common::build_test_app();
    create_method(&app, "ping", "concurrent").await;

    let response = post_json(
        app,
        "/api/v1/call",
        json!({ "user_ref": "", "method": "ping", "params": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
