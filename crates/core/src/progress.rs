//! Progress arithmetic for the seven-step wizard.
//!
//! Pure functions over [`StepProgress`]: the completion percentage that the
//! store keeps denormalized on every project, and the lowest incomplete
//! step that drives the wizard's auto-advance.

use crate::project::StepProgress;
use crate::steps::{IntakeStep, TOTAL_STEPS};

/// `round(100 * completed / 7)` as an integer percentage.
pub fn completion_rate(progress: &StepProgress) -> u8 {
    let completed = f64::from(progress.completed_count());
    ((completed / f64::from(TOTAL_STEPS)) * 100.0).round() as u8
}

/// The lowest-numbered step whose flag is still false, or `None` when the
/// wizard is complete.
pub fn next_incomplete_step(progress: &StepProgress) -> Option<IntakeStep> {
    IntakeStep::ALL
        .into_iter()
        .find(|step| !progress.flag(*step))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
