//! Handlers for method registration and lookup.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fedits_db::models::method::CreateMethod;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/methods
pub async fn list_methods(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let methods = state.catalog.list_methods().await?;
    Ok(Json(DataResponse { data: methods }))
}

/// POST /api/v1/methods
///
/// Register a method. The name must be camelCase and unique.
pub async fn create_method(
    State(state): State<AppState>,
    payload: Result<Json<CreateMethod>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let method = state.catalog.create_method(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: method })))
}

/// GET /api/v1/methods/{name}
pub async fn get_method(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let method = state.catalog.get_method(&name).await?;
    Ok(Json(DataResponse { data: method }))
}

/// GET /api/v1/methods/{name}/providers
///
/// Providers bound to the method, in the order `Fallback` would try them.
pub async fn list_method_providers(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let providers = state.catalog.list_providers(&name).await?;
    Ok(Json(DataResponse { data: providers }))
}
