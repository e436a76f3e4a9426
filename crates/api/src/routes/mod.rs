pub mod generate;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate                 submit (POST), status by ?jobId= (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(generate::router())
}
