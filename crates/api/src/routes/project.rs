//! Route definitions for the `/projects` resource, including step
//! submission and the manual reminder.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{project, reminder, step};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// POST   /{id}/steps/{step}   -> submit
/// POST   /{id}/reminder       -> send_one
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", get(project::get_by_id).put(project::update))
        .route("/{id}/steps/{step}", post(step::submit))
        .route("/{id}/reminder", post(reminder::send_one))
}
