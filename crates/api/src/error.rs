use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fedits_engine::EngineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`EngineError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A dispatch or catalog error from `fedits_engine`.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Engine(EngineError::from(errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Engine(err) => classify_engine_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify an engine error into an HTTP status, error code, and message.
fn classify_engine_error(err: &EngineError) -> (StatusCode, &'static str, String) {
    match err {
        EngineError::MethodNotFound(_) | EngineError::ProviderNotFound(_) => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        EngineError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        EngineError::InvalidSignature => {
            (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE", err.to_string())
        }
        EngineError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        EngineError::NoProviderAvailable { method, failures } => {
            tracing::warn!(method = %method, ?failures, "No provider available");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "NO_PROVIDER_AVAILABLE",
                err.to_string(),
            )
        }
        EngineError::Provider(provider_err) => {
            tracing::warn!(error = %provider_err, "Every provider failed");
            (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_ERROR",
                match provider_err.provider() {
                    Some(slug) => format!("Provider '{slug}' failed to handle the call"),
                    None => "Provider call failed".to_string(),
                },
            )
        }
        EngineError::Cancelled => (
            StatusCode::REQUEST_TIMEOUT,
            "REQUEST_CANCELLED",
            err.to_string(),
        ),
        EngineError::Crypto(_) | EngineError::Serialization(_) | EngineError::Registry(_) => {
            tracing::error!(error = %err, "Engine error");
            internal()
        }
    }
}
