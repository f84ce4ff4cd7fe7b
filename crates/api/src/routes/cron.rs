//! Route definitions for scheduler-triggered jobs.

use axum::routing::post;
use axum::Router;

use crate::handlers::reminder;
use crate::state::AppState;

/// Routes mounted at `/cron`.
///
/// ```text
/// POST /reminders  -> trigger_scan (Authorization: Bearer <CRON_SECRET>)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/reminders", post(reminder::trigger_scan))
}
