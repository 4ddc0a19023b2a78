//! Handlers for provider registration and signed provider mutations.
//!
//! `PATCH` and `DELETE` require an `X-Signature` header: the hex
//! HMAC-SHA256, keyed with the provider's current secret, of the canonical
//! mutation bytes (the update as the server serializes it, or
//! `{"slug":"<slug>"}` for a delete).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use fedits_core::signing::SIGNATURE_HEADER;
use fedits_db::models::provider::{CreateProvider, ProviderUpdate};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// A missing header verifies as an empty (and therefore wrong) signature.
fn signature(headers: &HeaderMap) -> &str {
    headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// POST /api/v1/providers
pub async fn create_provider(
    State(state): State<AppState>,
    payload: Result<Json<CreateProvider>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let provider = state.catalog.create_provider(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: provider })))
}

/// GET /api/v1/providers/{slug}
pub async fn get_provider(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let provider = state.catalog.get_provider(&slug).await?;
    Ok(Json(DataResponse { data: provider }))
}

/// PATCH /api/v1/providers/{slug}
pub async fn update_provider(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<ProviderUpdate>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(update) = payload?;
    let provider = state
        .catalog
        .update_provider(&slug, signature(&headers), update)
        .await?;
    Ok(Json(DataResponse { data: provider }))
}

/// DELETE /api/v1/providers/{slug}
pub async fn delete_provider(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    state
        .catalog
        .delete_provider(&slug, signature(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
