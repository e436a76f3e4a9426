//! Route definitions for the `/generate` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::generate;
use crate::state::AppState;

/// Routes mounted under `/api`.
///
/// ```text
/// POST   /generate            -> submit_generation
/// GET    /generate?jobId=     -> get_generation_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/generate",
        get(generate::get_generation_status).post(generate::submit_generation),
    )
}
