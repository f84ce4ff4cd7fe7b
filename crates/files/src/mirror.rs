//! Best-effort NAS mirror.
//!
//! The share is reached through a host mount point (SMB/NFS mounted by the
//! operating system), so mirroring is plain filesystem I/O against a
//! configured root. When no mount is configured the no-op implementation is
//! wired in instead, so the rest of the code never branches on "is the NAS
//! configured".

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Error from a mirror operation. Callers log these and continue; a mirror
/// failure never fails the triggering request.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("mirror I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Duplicate-write target for uploads and staged data.
#[async_trait]
pub trait NasMirror: Send + Sync {
    /// Create `relative` (and parents) under the mirror root.
    async fn ensure_dir(&self, relative: &Path) -> Result<(), MirrorError>;

    /// Write `bytes` to `relative` under the mirror root.
    async fn write(&self, relative: &Path, bytes: &[u8]) -> Result<(), MirrorError>;

    /// Remove `relative` under the mirror root. Missing files are fine.
    async fn remove(&self, relative: &Path) -> Result<(), MirrorError>;
}

/// Mirror writing into a mounted network share.
pub struct MountedShareMirror {
    mount: PathBuf,
}

impl MountedShareMirror {
    pub fn new(mount: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.into(),
        }
    }
}

#[async_trait]
impl NasMirror for MountedShareMirror {
    async fn ensure_dir(&self, relative: &Path) -> Result<(), MirrorError> {
        tokio::fs::create_dir_all(self.mount.join(relative)).await?;
        tracing::debug!(path = %relative.display(), "NAS directory ensured");
        Ok(())
    }

    async fn write(&self, relative: &Path, bytes: &[u8]) -> Result<(), MirrorError> {
        let dest = self.mount.join(relative);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, bytes).await?;
        tracing::debug!(path = %relative.display(), size = bytes.len(), "File mirrored to NAS");
        Ok(())
    }

    async fn remove(&self, relative: &Path) -> Result<(), MirrorError> {
        match tokio::fs::remove_file(self.mount.join(relative)).await {
            Ok(()) => {
                tracing::debug!(path = %relative.display(), "File removed from NAS");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Mirror used when no share is configured.
pub struct NoopMirror;

#[async_trait]
impl NasMirror for NoopMirror {
    async fn ensure_dir(&self, _relative: &Path) -> Result<(), MirrorError> {
        Ok(())
    }

    async fn write(&self, relative: &Path, _bytes: &[u8]) -> Result<(), MirrorError> {
        tracing::trace!(path = %relative.display(), "NAS not configured, skipping mirror write");
        Ok(())
    }

    async fn remove(&self, _relative: &Path) -> Result<(), MirrorError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
