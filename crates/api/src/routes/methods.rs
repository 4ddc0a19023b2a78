//! Route definitions for method registration, mounted at `/methods`.

use axum::routing::get;
use axum::Router;

use crate::handlers::methods;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list_methods
/// POST   /                  -> create_method
/// GET    /{name}            -> get_method
/// GET    /{name}/providers  -> list_method_providers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(methods::list_methods).post(methods::create_method))
        .route("/{name}", get(methods::get_method))
        .route("/{name}/providers", get(methods::list_method_providers))
}
