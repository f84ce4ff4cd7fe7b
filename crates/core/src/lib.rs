//! Domain model for the client-intake portal.
//!
//! Pure types and logic with no I/O: the project record, the seven wizard
//! step schemas and their validation, progress arithmetic, upload
//! constraints, and the staleness/urgency predicates used by the reminder
//! scanner and the admin overview.

pub mod error;
pub mod payload;
pub mod progress;
pub mod project;
pub mod reminder;
pub mod steps;
pub mod upload;

pub use error::{CoreError, FieldViolation};
pub use project::{NewProject, Project, ProjectStatus, ProjectUpdate, StepData, StepProgress};
pub use steps::IntakeStep;
