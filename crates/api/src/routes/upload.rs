//! Route definitions for file uploads.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Routes mounted at `/uploads`.
///
/// ```text
/// POST   /  -> upload (multipart: project_id, category, file)
/// DELETE /  -> delete (json: project_id, path)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload::upload).delete(upload::delete))
        .layer(DefaultBodyLimit::max(upload::UPLOAD_BODY_LIMIT))
}
