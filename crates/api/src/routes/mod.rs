pub mod admin;
pub mod cron;
pub mod health;
pub mod project;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects                      list, create
/// /projects/{id}                 get, update
/// /projects/{id}/steps/{step}    submit step data (POST)
/// /projects/{id}/reminder        manual reminder (POST)
///
/// /uploads                       upload (POST, multipart), delete (DELETE)
///
/// /cron/reminders                reminder scan (POST, bearer-guarded)
///
/// /admin/projects                overview with stats and filters (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/uploads", upload::router())
        .nest("/cron", cron::router())
        .nest("/admin", admin::router())
}
