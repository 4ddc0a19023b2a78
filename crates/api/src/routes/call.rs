use axum::routing::post;
use axum::Router;

use crate::handlers::call;
use crate::state::AppState;

/// ```text
/// POST   /call              -> call_method
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/call", post(call::call_method))
}
