use std::sync::Arc;

use intake_files::{LocalFileStore, NasMirror, StagingArea};
use intake_notify::NotificationDispatcher;
use intake_store::ProjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Everything is behind `Arc`, so cloning per request is cheap. The store
/// is the single shared instance the whole process operates on; nothing
/// else holds project state.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory project store.
    pub store: Arc<ProjectStore>,
    /// Local attachment storage.
    pub files: Arc<LocalFileStore>,
    /// Staged step-data snapshots.
    pub staging: Arc<StagingArea>,
    /// Best-effort NAS mirror (no-op when unconfigured).
    pub mirror: Arc<dyn NasMirror>,
    /// Outbound notification dispatcher.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
