//! Email notifications for intake events.
//!
//! [`mailer`] abstracts the SMTP transport behind a trait so deployments
//! without mail configuration run against a no-op implementation, and
//! [`dispatcher`] composes and sends the three message kinds: step
//! completed, project completed, and staleness reminder.

pub mod dispatcher;
pub mod mailer;

pub use dispatcher::{DispatcherSettings, NotificationDispatcher, NotifyError};
pub use mailer::{EmailConfig, EmailError, Mailer, NoopMailer, SmtpMailer};
