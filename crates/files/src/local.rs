//! Local attachment storage.
//!
//! Uploads land under `<root>/<project_id>/<category>/<generated-name>`,
//! where the generated name is a fresh UUID carrying the original file
//! extension so concurrent uploads of `logo.png` never collide. The
//! relative part of that path is what gets recorded on the project and
//! replayed against the NAS mirror.

use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use intake_core::upload::{file_extension, validate_upload, FileAttachment};

use crate::FileStoreError;

/// Attachment store rooted at the configured upload directory.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and persist one upload, returning its attachment record.
    pub async fn save(
        &self,
        project_id: Uuid,
        category: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<FileAttachment, FileStoreError> {
        validate_upload(file_name, content_type, bytes.len() as u64)?;
        let category = checked_component(category)?;

        let extension = file_extension(file_name).unwrap_or_default();
        let generated = format!("{}{extension}", Uuid::new_v4());
        let relative = format!("{project_id}/{category}/{generated}");

        let dest = self.root.join(&relative);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, bytes).await?;
        tracing::debug!(path = %relative, size = bytes.len(), "Upload stored");

        Ok(FileAttachment {
            name: file_name.to_string(),
            size: bytes.len() as u64,
            content_type: content_type.to_string(),
            path: relative,
            uploaded_at: Utc::now(),
        })
    }

    /// Delete a stored upload by its relative path.
    ///
    /// The path must sit inside the given project's directory; anything
    /// with traversal components or a foreign project prefix is rejected
    /// before touching the disk.
    pub async fn delete(&self, project_id: Uuid, relative: &str) -> Result<(), FileStoreError> {
        let full = self.resolve(project_id, relative)?;

        if tokio::fs::metadata(&full).await.is_err() {
            return Err(FileStoreError::NotFound(relative.to_string()));
        }
        tokio::fs::remove_file(&full).await?;
        tracing::debug!(path = %relative, "Upload deleted");
        Ok(())
    }

    fn resolve(&self, project_id: Uuid, relative: &str) -> Result<PathBuf, FileStoreError> {
        let path = Path::new(relative);
        let mut components = path.components();

        let project_prefix = project_id.to_string();
        match components.next() {
            Some(Component::Normal(first)) if first.to_string_lossy() == project_prefix => {}
            _ => {
                return Err(FileStoreError::InvalidPath(relative.to_string()));
            }
        }
        if !components.all(|c| matches!(c, Component::Normal(_))) {
            return Err(FileStoreError::InvalidPath(relative.to_string()));
        }

        Ok(self.root.join(path))
    }
}

/// A single path component: non-empty, no separators, no traversal.
fn checked_component(value: &str) -> Result<&str, FileStoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed == ".."
        || trimmed.contains('/')
        || trimmed.contains('\\')
    {
        return Err(FileStoreError::InvalidPath(value.to_string()));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
