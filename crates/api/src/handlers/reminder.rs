//! Reminder triggers: the scheduler-facing scan and the manual per-project
//! nudge.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::CronAuth;
use crate::background::reminder::{run_scan, ScanReport};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/cron/reminders
///
/// Bearer-guarded by [`CronAuth`]; a bad token is rejected before any send
/// happens.
pub async fn trigger_scan(
    _auth: CronAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ScanReport>>> {
    let report = run_scan(
        &state.store,
        &state.dispatcher,
        Utc::now(),
        chrono::Duration::days(state.config.reminder_stale_days),
    )
    .await;

    Ok(Json(DataResponse { data: report }))
}

/// Response for the manual reminder endpoint.
#[derive(Debug, Serialize)]
pub struct ReminderResult {
    pub project_id: Uuid,
    pub sent: bool,
}

/// POST /api/v1/projects/{id}/reminder
///
/// Manual nudge from the admin dashboard. Completed projects are rejected;
/// a delivery failure is logged and reported as `sent: false` rather than
/// failing the request.
pub async fn send_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<ReminderResult>>> {
    let project = state.store.get(id).await?;

    if project.completion_rate >= 100 {
        return Err(AppError::BadRequest(
            "project is already completed".into(),
        ));
    }

    let sent = match state.dispatcher.reminder(&project).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, project_id = %id, "Manual reminder failed");
            false
        }
    };

    Ok(Json(DataResponse {
        data: ReminderResult {
            project_id: id,
            sent,
        },
    }))
}
