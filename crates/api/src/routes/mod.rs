pub mod call;
pub mod health;
pub mod methods;
pub mod providers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /call                          dispatch a method call (POST)
///
/// /methods                       list, register
/// /methods/{name}                get
/// /methods/{name}/providers      providers bound to the method
///
/// /providers                     register (POST)
/// /providers/{slug}              get, update, delete (signed)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(call::router())
        .nest("/methods", methods::router())
        .nest("/providers", providers::router())
}
