//! File upload and deletion.
//!
//! Uploads arrive as multipart forms with `project_id`, `category`, and
//! `file` fields. The local write is authoritative; the NAS mirror is
//! attempted afterwards and only logged on failure.

use std::path::Path as FsPath;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use intake_core::upload::FileAttachment;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body cap for the upload route. Well above the 10 MiB attachment cap so
/// oversized files reach the domain check and get a proper 413 instead of
/// being cut off mid-stream.
pub const UPLOAD_BODY_LIMIT: usize = 32 * 1024 * 1024;

struct UploadForm {
    project_id: Uuid,
    category: String,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// POST /api/v1/uploads
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<FileAttachment>>)> {
    let form = read_form(multipart).await?;

    // Reject unknown projects before any disk write.
    state.store.get(form.project_id).await?;

    let attachment = state
        .files
        .save(
            form.project_id,
            &form.category,
            &form.file_name,
            &form.content_type,
            &form.bytes,
        )
        .await?;

    if let Err(e) = state
        .mirror
        .write(FsPath::new(&attachment.path), &form.bytes)
        .await
    {
        tracing::warn!(error = %e, path = %attachment.path, "NAS mirror write failed");
    }

    let project = state
        .store
        .attach_file(form.project_id, &form.category, attachment.clone())
        .await?;
    tracing::info!(
        project_id = %project.id,
        path = %attachment.path,
        size = attachment.size,
        "Upload accepted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: attachment })))
}

/// Request body for upload deletion.
#[derive(Debug, Deserialize)]
pub struct DeleteUpload {
    pub project_id: Uuid,
    pub path: String,
}

/// DELETE /api/v1/uploads
pub async fn delete(
    State(state): State<AppState>,
    Json(request): Json<DeleteUpload>,
) -> AppResult<StatusCode> {
    state.store.get(request.project_id).await?;

    state.files.delete(request.project_id, &request.path).await?;

    if let Err(e) = state.mirror.remove(FsPath::new(&request.path)).await {
        tracing::warn!(error = %e, path = %request.path, "NAS mirror delete failed");
    }

    state
        .store
        .detach_file(request.project_id, &request.path)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut project_id = None;
    let mut category = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("project_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let id = text
                    .parse()
                    .map_err(|_| AppError::BadRequest(format!("invalid project id: {text}")))?;
                project_id = Some(id);
            }
            Some("category") => {
                category = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let project_id =
        project_id.ok_or_else(|| AppError::BadRequest("missing field: project_id".into()))?;
    let category =
        category.ok_or_else(|| AppError::BadRequest("missing field: category".into()))?;
    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("missing field: file".into()))?;

    Ok(UploadForm {
        project_id,
        category,
        file_name,
        content_type,
        bytes,
    })
}
