//! Staleness and urgency predicates.
//!
//! Both are pure over a project and a point in time so the reminder scanner
//! and the admin overview can be tested without touching the clock.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::project::{Project, ProjectStatus};

/// Whether a project qualifies for a staleness reminder.
///
/// Active, not yet at 100%, and untouched for at least `stale_after`.
pub fn is_stale(project: &Project, now: DateTime<Utc>, stale_after: Duration) -> bool {
    project.status == ProjectStatus::Active
        && project.completion_rate < 100
        && now - project.updated_at >= stale_after
}

/// Operational urgency flag shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Warning,
    Urgent,
}

/// Urgency from age-since-creation and completion rate: a week with nothing
/// submitted is urgent, five days under 50% is a warning.
pub fn urgency(project: &Project, now: DateTime<Utc>) -> Urgency {
    let age = now - project.created_at;
    if project.completion_rate == 0 && age > Duration::days(7) {
        Urgency::Urgent
    } else if project.completion_rate < 50 && age > Duration::days(5) {
        Urgency::Warning
    } else {
        Urgency::Normal
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
