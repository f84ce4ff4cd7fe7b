//! Staleness reminder scan.
//!
//! [`run_scan`] is the single implementation shared by the bearer-guarded
//! `/cron/reminders` endpoint and the optional in-process sweep started
//! from `main`. A failed send for one project is recorded and the scan
//! moves on; nothing aborts the sweep.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use intake_notify::NotificationDispatcher;
use intake_store::ProjectStore;

/// Outcome of one reminder attempt.
#[derive(Debug, Serialize)]
pub struct ScanOutcome {
    pub project_id: Uuid,
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a whole sweep.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// How many projects matched the staleness predicate.
    pub scanned: usize,
    /// How many reminders were delivered.
    pub sent: usize,
    pub results: Vec<ScanOutcome>,
}

/// Select stale projects as of `now` and send each a reminder.
pub async fn run_scan(
    store: &ProjectStore,
    dispatcher: &NotificationDispatcher,
    now: DateTime<Utc>,
    stale_after: chrono::Duration,
) -> ScanReport {
    let candidates = store.stale_projects(now, stale_after).await;
    let scanned = candidates.len();

    let mut results = Vec::with_capacity(scanned);
    let mut sent = 0;

    for project in candidates {
        match dispatcher.reminder(&project).await {
            Ok(()) => {
                sent += 1;
                results.push(ScanOutcome {
                    project_id: project.id,
                    sent: true,
                    error: None,
                });
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    project_id = %project.id,
                    "Reminder delivery failed"
                );
                results.push(ScanOutcome {
                    project_id: project.id,
                    sent: false,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    tracing::info!(scanned, sent, "Reminder scan finished");
    ScanReport {
        scanned,
        sent,
        results,
    }
}

/// Run the in-process reminder sweep on a fixed interval until cancelled.
///
/// Deployments that trigger the scan through an external scheduler leave
/// `REMINDER_SCAN_INTERVAL_SECS` unset and never start this task.
pub async fn run(
    store: Arc<ProjectStore>,
    dispatcher: Arc<NotificationDispatcher>,
    interval_secs: u64,
    stale_days: i64,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs, stale_days, "Reminder sweep started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    // The first tick fires immediately; skip it so a restart does not
    // re-send reminders right away.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reminder sweep stopping");
                break;
            }
            _ = interval.tick() => {
                run_scan(
                    &store,
                    &dispatcher,
                    Utc::now(),
                    chrono::Duration::days(stale_days),
                )
                .await;
            }
        }
    }
}
