//! Filesystem collaborators: the local upload store, staged step-data
//! snapshots, and the best-effort NAS mirror.
//!
//! The local disk is always authoritative. The mirror duplicates writes to
//! a network share when one is configured and is never allowed to fail a
//! request; callers log mirror errors and move on.

pub mod local;
pub mod mirror;
pub mod staging;

pub use local::LocalFileStore;
pub use mirror::{MountedShareMirror, NasMirror, NoopMirror};
pub use staging::StagingArea;

/// Errors from the local filesystem collaborators.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// Upload constraint violation (size cap, type allow-list).
    #[error(transparent)]
    Core(#[from] intake_core::CoreError),

    /// The referenced file does not exist locally.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The path escapes the project's directory or contains bad components.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
