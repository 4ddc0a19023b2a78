//! Handler for dispatching a method call to its providers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /api/v1/call`.
#[derive(Debug, Deserialize, Validate)]
pub struct CallRequest {
    #[validate(length(min = 1, message = "user_ref must not be empty"))]
    pub user_ref: String,
    #[validate(length(min = 1, message = "method must not be empty"))]
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

/// POST /api/v1/call
///
/// Dispatch a call under the method's policy and return the winning
/// provider's envelope.
///
/// If the request is dropped (client disconnect or request timeout) the
/// dispatch is cancelled; once it completes, broadcast losers are left to
/// finish on their own.
pub async fn call_method(
    State(state): State<AppState>,
    payload: Result<Json<CallRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    input.validate()?;

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let outcome = state
        .orchestrator
        .request(&cancel, &input.user_ref, &input.method, input.params)
        .await;
    guard.disarm();

    let envelope = outcome?;
    Ok(Json(DataResponse { data: envelope }))
}
