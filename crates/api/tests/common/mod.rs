#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fedits_api::app::build_router;
use fedits_api::config::ServerConfig;
use fedits_api::state::AppState;
use fedits_db::InMemoryRegistry;

/// 32-byte sealing key used by every test app.
pub const HASH_SECRET: &str = "0123456789abcdef0123456789abcdef";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        provider_timeout_secs: 5,
        hash_secret: HASH_SECRET.to_string(),
        version: "9.9.9".to_string(),
    }
}

/// Build the full application router over an empty in-memory registry.
///
/// Uses the same middleware stack production uses. Clones of the returned
/// router share state.
pub fn build_test_app() -> Router {
    let state = AppState::build(test_config(), Arc::new(InMemoryRegistry::new()))
        .expect("test HASH_SECRET is 32 bytes");
    build_router(state)
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    json_request(app, Method::POST, uri, body, None).await
}

/// Send a JSON body, optionally with an `X-Signature` header.
pub async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: Value,
    signature: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("x-signature", signature);
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a method through the API.
pub async fn create_method(app: &Router, name: &str, kind: &str) {
    let response = post_json(
        app.clone(),
        "/api/v1/methods",
        serde_json::json!({
            "name": name,
            "params": ["string"],
            "description": format!("{name} method"),
            "result_structure": {},
            "kind": kind,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "creating method {name}");
}

/// Register a provider through the API.
pub async fn create_provider(app: &Router, slug: &str, webhook: &str, secret: &str, methods: &[&str]) {
    let response = post_json(
        app.clone(),
        "/api/v1/providers",
        serde_json::json!({
            "name": slug.to_uppercase(),
            "slug": slug,
            "webhook": webhook,
            "secret": secret,
            "methods": methods,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "creating provider {slug}");
}
