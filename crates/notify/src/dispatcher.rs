//! Composes and sends the three notification kinds.
//!
//! Step and project completion go to both the client contact and the
//! operator address as independent sends: a failure on one recipient never
//! blocks the other, and no failure ever propagates to the caller; the
//! state change that triggered the notification has already committed.
//! Reminders go to the contact only and report their outcome so the scan
//! can account per project.
//!
//! Every send is bounded by a timeout so a slow relay cannot stall the
//! process.

use std::sync::Arc;
use std::time::Duration;

use intake_core::progress::next_incomplete_step;
use intake_core::{IntakeStep, Project};

use crate::mailer::{EmailError, Mailer};

/// Error from a reminder send, reported back to the scanner.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("send timed out")]
    Timeout,

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Addresses and bounds for outbound notifications.
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    /// Operator copy for completion events.
    pub operator_email: String,
    /// Base URL used in links back to the portal.
    pub base_url: String,
    /// Upper bound for a single SMTP conversation.
    pub send_timeout: Duration,
}

/// Sends templated notifications for intake events.
pub struct NotificationDispatcher {
    mailer: Arc<dyn Mailer>,
    settings: DispatcherSettings,
}

impl NotificationDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, settings: DispatcherSettings) -> Self {
        Self { mailer, settings }
    }

    /// Notify the contact and the operator that one step finished.
    pub async fn step_completed(&self, project: &Project, step: IntakeStep) {
        let (client_subject, client_body) = self.step_completed_client(project, step);
        let (operator_subject, operator_body) = self.step_completed_operator(project, step);

        tokio::join!(
            self.send_logged(&project.email, &client_subject, &client_body),
            self.send_logged(&self.settings.operator_email, &operator_subject, &operator_body),
        );
    }

    /// Notify the contact and the operator that every step is complete.
    pub async fn project_completed(&self, project: &Project) {
        let (client_subject, client_body) = self.project_completed_client(project);
        let (operator_subject, operator_body) = self.project_completed_operator(project);

        tokio::join!(
            self.send_logged(&project.email, &client_subject, &client_body),
            self.send_logged(&self.settings.operator_email, &operator_subject, &operator_body),
        );
    }

    /// Send a staleness reminder to the contact. The outcome is returned so
    /// the reminder scan can collect per-project results.
    pub async fn reminder(&self, project: &Project) -> Result<(), NotifyError> {
        let (subject, body) = self.reminder_client(project);
        self.send_bounded(&project.email, &subject, &body).await
    }

    async fn send_logged(&self, to: &str, subject: &str, body: &str) {
        if let Err(e) = self.send_bounded(to, subject, body).await {
            tracing::error!(error = %e, to, subject, "Notification delivery failed");
        }
    }

    async fn send_bounded(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        match tokio::time::timeout(
            self.settings.send_timeout,
            self.mailer.send(to, subject, body),
        )
        .await
        {
            Ok(result) => Ok(result?),
            Err(_) => Err(NotifyError::Timeout),
        }
    }

    // -- message composition ------------------------------------------------

    fn project_link(&self, project: &Project) -> String {
        format!("{}/project/{}", self.settings.base_url, project.id)
    }

    fn admin_link(&self) -> String {
        format!("{}/admin", self.settings.base_url)
    }

    fn step_completed_client(&self, project: &Project, step: IntakeStep) -> (String, String) {
        let subject = format!("[Intake] {} completed - {}", step.title(), project.company_name);
        let mut body = format!(
            "Hello {},\n\n\
             The \"{}\" step for the {} website project has been received.\n\n\
             Progress: {}% ({} of 7 steps complete)\n",
            project.manager_name,
            step.title(),
            project.company_name,
            project.completion_rate,
            project.progress.completed_count(),
        );
        if let Some(next) = next_incomplete_step(&project.progress) {
            body.push_str(&format!("Next step: {}\n", next.title()));
        }
        body.push_str(&format!("\nContinue here: {}\n", self.project_link(project)));
        (subject, body)
    }

    fn step_completed_operator(&self, project: &Project, step: IntakeStep) -> (String, String) {
        let subject = format!(
            "[Intake] {}: step {} ({}) completed",
            project.company_name,
            step.to_number(),
            step.title(),
        );
        let body = format!(
            "Company: {}\n\
             Contact: {} <{}>\n\
             Completed step: {}. {}\n\
             Progress: {}%\n\
             Project id: {}\n\n\
             Dashboard: {}\n",
            project.company_name,
            project.manager_name,
            project.email,
            step.to_number(),
            step.title(),
            project.completion_rate,
            project.id,
            self.admin_link(),
        );
        (subject, body)
    }

    fn project_completed_client(&self, project: &Project) -> (String, String) {
        let subject = format!(
            "[Intake] All materials received for {}",
            project.company_name
        );
        let mut body = format!(
            "Hello {},\n\n\
             Every step of the intake for the {} website project is now\n\
             complete. Collected materials:\n\n",
            project.manager_name, project.company_name,
        );
        for step in IntakeStep::ALL {
            body.push_str(&format!("  - {}\n", step.title()));
        }
        body.push_str(
            "\nOur design team will now start production and keep you posted\n\
             on progress. Thank you!\n",
        );
        (subject, body)
    }

    fn project_completed_operator(&self, project: &Project) -> (String, String) {
        let subject = format!("[Intake] Project complete: {}", project.company_name);
        let body = format!(
            "All materials collected.\n\n\
             Company: {}\n\
             Contact: {} <{}> / {}\n\
             Project id: {}\n\
             Started: {}\n\n\
             Review the collected materials and assign the project:\n\
             {}\n\
             {}\n",
            project.company_name,
            project.manager_name,
            project.email,
            project.phone,
            project.id,
            project.created_at.format("%Y-%m-%d"),
            self.admin_link(),
            self.project_link(project),
        );
        (subject, body)
    }

    fn reminder_client(&self, project: &Project) -> (String, String) {
        let subject = format!(
            "[Intake] Waiting on materials for {}",
            project.company_name
        );
        let pending: Vec<&str> = IntakeStep::ALL
            .into_iter()
            .filter(|step| !project.progress.flag(*step))
            .map(IntakeStep::title)
            .collect();

        let mut body = format!(
            "Hello {},\n\n\
             The intake for the {} website project is still in progress.\n\
             Current progress: {}%\n\n\
             Outstanding steps:\n",
            project.manager_name, project.company_name, project.completion_rate,
        );
        for title in pending {
            body.push_str(&format!("  - {title}\n"));
        }
        body.push_str(&format!(
            "\nPick up where you left off: {}\n",
            self.project_link(project)
        ));
        (subject, body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use intake_core::{ProjectStatus, StepData, StepProgress};
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), EmailError> {
            if self.fail_for.as_deref() == Some(to) {
                return Err(EmailError::Build("relay rejected".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    fn settings() -> DispatcherSettings {
        DispatcherSettings {
            operator_email: "admin@intake.local".into(),
            base_url: "http://localhost:3000".into(),
            send_timeout: Duration::from_secs(1),
        }
    }

    fn project(rate: u8, progress: StepProgress) -> Project {
        Project {
            id: Uuid::new_v4(),
            company_name: "Acme Industries".into(),
            manager_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "010-1234-5678".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            status: ProjectStatus::Active,
            progress,
            completion_rate: rate,
            steps: StepData::default(),
        }
    }

    #[tokio::test]
    async fn step_completed_reaches_contact_and_operator() {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = NotificationDispatcher::new(mailer.clone(), settings());

        let mut progress = StepProgress::default();
        progress.set(IntakeStep::CompanyInfo);
        let p = project(14, progress);

        dispatcher.step_completed(&p, IntakeStep::CompanyInfo).await;

        let sent = mailer.sent.lock().unwrap();
        let recipients: Vec<&str> = sent.iter().map(|(to, _)| to.as_str()).collect();
        assert!(recipients.contains(&"jane@example.com"));
        assert!(recipients.contains(&"admin@intake.local"));
        assert_eq!(sent.len(), 2);
    }

    #[tokio::test]
    async fn one_failed_recipient_does_not_block_the_other() {
        let mailer = Arc::new(RecordingMailer {
            fail_for: Some("jane@example.com".into()),
            ..Default::default()
        });
        let dispatcher = NotificationDispatcher::new(mailer.clone(), settings());

        dispatcher
            .step_completed(&project(14, StepProgress::default()), IntakeStep::CompanyInfo)
            .await;

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "admin@intake.local");
    }

    #[tokio::test]
    async fn reminder_goes_to_contact_only_and_reports_outcome() {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = NotificationDispatcher::new(mailer.clone(), settings());

        dispatcher
            .reminder(&project(43, StepProgress::default()))
            .await
            .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "jane@example.com");
    }

    #[tokio::test]
    async fn reminder_failure_is_surfaced() {
        let mailer = Arc::new(RecordingMailer {
            fail_for: Some("jane@example.com".into()),
            ..Default::default()
        });
        let dispatcher = NotificationDispatcher::new(mailer, settings());

        let err = dispatcher
            .reminder(&project(43, StepProgress::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Email(_)));
    }

    #[test]
    fn step_body_carries_rate_and_next_step() {
        let dispatcher =
            NotificationDispatcher::new(Arc::new(RecordingMailer::default()), settings());
        let mut progress = StepProgress::default();
        progress.set(IntakeStep::CompanyInfo);
        progress.set(IntakeStep::HostingDomain);
        let p = project(29, progress);

        let (subject, body) = dispatcher.step_completed_client(&p, IntakeStep::HostingDomain);
        assert!(subject.contains("Hosting & Domain"));
        assert!(body.contains("29%"));
        assert!(body.contains("2 of 7"));
        assert!(body.contains("Next step: Mail Records"));
        assert!(body.contains(&format!("/project/{}", p.id)));
    }

    #[test]
    fn reminder_body_lists_outstanding_steps() {
        let dispatcher =
            NotificationDispatcher::new(Arc::new(RecordingMailer::default()), settings());
        let mut progress = StepProgress::default();
        progress.set(IntakeStep::CompanyInfo);
        let p = project(14, progress);

        let (_, body) = dispatcher.reminder_client(&p);
        assert!(!body.contains("- Company & Contact Information"));
        assert!(body.contains("- Hosting & Domain"));
        assert!(body.contains("- Website Assets"));
    }

    #[test]
    fn completion_body_lists_every_step() {
        let dispatcher =
            NotificationDispatcher::new(Arc::new(RecordingMailer::default()), settings());
        let p = project(100, StepProgress::default());

        let (subject, body) = dispatcher.project_completed_client(&p);
        assert!(subject.contains("Acme Industries"));
        for step in IntakeStep::ALL {
            assert!(body.contains(step.title()), "{}", step.title());
        }
    }
}
