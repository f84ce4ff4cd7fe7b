//! Step submission.
//!
//! The one state-changing operation of the wizard: validate the payload for
//! the step, apply it atomically in the store, then run the side effects
//! (staged snapshot, notifications), none of which can roll the commit
//! back.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use intake_core::payload::StepPayload;
use intake_core::{IntakeStep, Project};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/steps/{step}
pub async fn submit(
    State(state): State<AppState>,
    Path((id, step_number)): Path<(Uuid, u8)>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<Project>> {
    let step = IntakeStep::from_number(step_number)?;
    let payload = StepPayload::parse(step, raw.clone())?;

    let submission = state.store.submit_step(id, payload).await?;

    // Staged snapshot of the submitted data, mirrored to the NAS.
    // Best-effort: the store commit above is already final.
    if let Err(e) = state
        .staging
        .snapshot_and_mirror(&submission.project, step, &raw, state.mirror.as_ref())
        .await
    {
        tracing::warn!(
            error = %e,
            project_id = %id,
            step = step.to_number(),
            "Step snapshot failed"
        );
    }

    // Fire-and-forget notifications; the response does not wait on SMTP.
    let dispatcher = state.dispatcher.clone();
    let project = submission.project.clone();
    let just_completed = submission.just_completed;
    tokio::spawn(async move {
        dispatcher.step_completed(&project, step).await;
        if just_completed {
            dispatcher.project_completed(&project).await;
        }
    });

    Ok(Json(submission.project))
}
