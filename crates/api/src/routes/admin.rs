//! Route definitions for the admin overview.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /projects  -> overview (query: status=all|active|completed|paused)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/projects", get(admin::overview))
}
