//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use intake_core::payload::violations_of;
use intake_core::{CoreError, NewProject, Project, ProjectUpdate};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects
///
/// Creates the project, then scaffolds its staging folders (locally and on
/// the NAS mirror) on a best-effort basis: a full disk or an unreachable
/// share never fails the creation.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let violations = violations_of(&input);
    if !violations.is_empty() {
        return Err(AppError::Core(CoreError::Validation(violations)));
    }

    let project = state.store.create(input).await;

    if let Err(e) = state
        .staging
        .scaffold_project(&project, state.mirror.as_ref())
        .await
    {
        tracing::warn!(
            error = %e,
            project_id = %project.id,
            "Staging scaffold failed, continuing without it"
        );
    }

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    Ok(Json(state.store.list().await))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Project>> {
    Ok(Json(state.store.get(id).await?))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectUpdate>,
) -> AppResult<Json<Project>> {
    Ok(Json(state.store.update(id, input).await?))
}
