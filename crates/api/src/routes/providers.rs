//! Route definitions for provider management, mounted at `/providers`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::providers;
use crate::state::AppState;

/// ```text
/// POST   /                  -> create_provider
/// GET    /{slug}            -> get_provider
/// PATCH  /{slug}            -> update_provider (X-Signature)
/// DELETE /{slug}            -> delete_provider (X-Signature)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(providers::create_provider))
        .route(
            "/{slug}",
            get(providers::get_provider)
                .patch(providers::update_provider)
                .delete(providers::delete_provider),
        )
}
