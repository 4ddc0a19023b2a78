//! Integration tests for `/api/v1/methods`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, create_method, create_provider, get, post_json, send};
use serde_json::json;

#[tokio::test]
async fn create_then_get_method() {
    let app = common::build_test_app();

    let response = post_json(
        app.clone(),
        "/api/v1/methods",
        json!({
            "name": "getRoute",
            "params": ["string", "string"],
            "description": "Route between two places",
            "result_structure": { "distance": "number" },
            "kind": "fallback",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["name"], "getRoute");
    assert_eq!(created["data"]["kind"], "fallback");
    assert!(created["data"].get("id").is_none());

    let fetched = body_json(get(app, "/api/v1/methods/getRoute").await).await;
    assert_eq!(fetched["data"], created["data"]);
}

#[tokio::test]
async fn kind_defaults_to_concurrent() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/methods",
        json!({ "name": "ping", "params": ["number"], "description": "Ping" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["kind"], "concurrent");
}

#[tokio::test]
async fn legacy_kind_label_is_accepted() {
    let app = common::build_test_app();
    create_method(&app, "lookup", "exchange").await;

    let fetched = body_json(get(app, "/api/v1/methods/lookup").await).await;
    assert_eq!(fetched["data"]["kind"], "fallback");
}

#[tokio::test]
async fn duplicate_method_returns_conflict() {
    let app = common::build_test_app();
    create_method(&app, "ping", "broadcast").await;

    let response = post_json(
        app,
        "/api/v1/methods",
        json!({ "name": "ping", "params": ["number"], "description": "Again" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn invalid_method_returns_validation_error() {
    let app = common::build_test_app();

    for body in [
        json!({ "name": "NotCamel", "params": ["number"], "description": "x" }),
        json!({ "name": "ping", "params": [], "description": "x" }),
        json!({ "name": "ping", "params": ["number"], "description": "" }),
        json!({ "name": "ping", "params": ["number"], "description": "x", "result_structure": 5 }),
    ] {
        let response = post_json(app.clone(), "/api/v1/methods", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn malformed_json_returns_bad_request() {
    let app = common::build_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/methods")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_kind_is_rejected() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/methods",
        json!({ "name": "ping", "params": ["number"], "description": "x", "kind": "gossip" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_method_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/methods/ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn methods_are_listed_by_name() {
    let app = common::build_test_app();
    create_method(&app, "zeta", "concurrent").await;
    create_method(&app, "alpha", "broadcast").await;

    let listed = body_json(get(app, "/api/v1/methods").await).await;
    let names: Vec<_> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["alpha", "zeta"]);
}

#[tokio::test]
async fn method_providers_are_listed_in_binding_order() {
    let app = common::build_test_app();
    create_method(&app, "lookup", "fallback").await;
    create_provider(&app, "second", "https://second.example/hook", "s2", &["lookup"]).await;
    create_provider(&app, "first", "https://first.example/hook", "s1", &["lookup"]).await;

    let listed = body_json(get(app, "/api/v1/methods/lookup/providers").await).await;
    let slugs: Vec<_> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, ["second", "first"]);
}
