//! Upload constraints and attachment metadata.
//!
//! The caps and allow-lists mirror what the intake forms accept: images,
//! PDFs, ZIP archives, and Illustrator files up to 10 MiB.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum accepted upload size: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted declared content types.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "application/zip",
    "application/x-zip-compressed",
    "application/vnd.adobe.illustrator",
    "application/postscript",
];

/// Accepted file extensions (lowercase, with leading dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".pdf", ".zip", ".ai",
];

/// Metadata for one stored upload, kept in the project's step-7 payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Original file name as declared by the client.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared content type.
    pub content_type: String,
    /// Relative storage path (`uploads/<project>/<category>/<generated>`).
    pub path: String,
    /// When the upload was accepted (UTC).
    pub uploaded_at: DateTime<Utc>,
}

/// Lowercased extension of `name`, including the dot.
pub fn file_extension(name: &str) -> Option<String> {
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 == name.len() {
        return None;
    }
    Some(name[dot..].to_ascii_lowercase())
}

/// Check an upload against the size cap and the type allow-lists.
///
/// Both the declared content type and the file extension must be on their
/// respective allow-lists, so a renamed binary does not slip through on a
/// spoofed MIME type alone.
pub fn validate_upload(file_name: &str, content_type: &str, size: u64) -> Result<(), CoreError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(CoreError::TooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }

    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(CoreError::UnsupportedType {
            content_type: content_type.to_string(),
        });
    }

    let extension_ok = file_extension(file_name)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);
    if !extension_ok {
        return Err(CoreError::UnsupportedType {
            content_type: content_type.to_string(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
