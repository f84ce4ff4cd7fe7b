//! In-memory project store.
//!
//! One [`ProjectStore`] instance is constructed at process start and shared
//! by every request handler through the application state; there is no
//! ambient global. State is volatile by design: a restart loses it.
//!
//! All read-modify-write sequences (step submission, shallow update, file
//! attach/detach) run under the store's single write lock so overlapping
//! submissions for the same project cannot lose updates.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use intake_core::payload::{CategoryFiles, Step7Data, StepPayload};
use intake_core::progress::completion_rate;
use intake_core::reminder::is_stale;
use intake_core::upload::FileAttachment;
use intake_core::{CoreError, NewProject, Project, ProjectStatus, ProjectUpdate};
use intake_core::{StepData, StepProgress};

/// Result of a successful step submission.
#[derive(Debug, Clone)]
pub struct StepSubmission {
    /// The project after the merge and recompute.
    pub project: Project,
    /// True only on the submission that moved the rate to 100.
    pub just_completed: bool,
}

/// Keyed mapping from project id to project record.
#[derive(Debug, Default)]
pub struct ProjectStore {
    projects: RwLock<HashMap<Uuid, Project>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a project with a fresh id and zeroed progress.
    pub async fn create(&self, input: NewProject) -> Project {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            company_name: input.company_name,
            manager_name: input.manager_name,
            email: input.email,
            phone: input.phone,
            created_at: now,
            updated_at: now,
            status: ProjectStatus::Active,
            progress: StepProgress::default(),
            completion_rate: 0,
            steps: StepData::default(),
        };

        let mut projects = self.projects.write().await;
        projects.insert(project.id, project.clone());
        tracing::debug!(
            project_id = %project.id,
            company = %project.company_name,
            total = projects.len(),
            "Project created"
        );
        project
    }

    /// Fetch a project by id.
    pub async fn get(&self, id: Uuid) -> Result<Project, CoreError> {
        self.projects
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Project", id))
    }

    /// All projects, for the admin views. Order is not significant.
    pub async fn list(&self) -> Vec<Project> {
        self.projects.read().await.values().cloned().collect()
    }

    /// Shallow merge: only provided fields are replaced, `updated_at` is
    /// always refreshed.
    pub async fn update(&self, id: Uuid, update: ProjectUpdate) -> Result<Project, CoreError> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("Project", id))?;

        if let Some(company_name) = update.company_name {
            project.company_name = company_name;
        }
        if let Some(manager_name) = update.manager_name {
            project.manager_name = manager_name;
        }
        if let Some(email) = update.email {
            project.email = email;
        }
        if let Some(phone) = update.phone {
            project.phone = phone;
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        project.updated_at = Utc::now();

        Ok(project.clone())
    }

    /// Remove a project. Returns false for unknown ids.
    ///
    /// No HTTP route deletes projects; this exists as a store capability
    /// (operational tooling, tests).
    pub async fn delete(&self, id: Uuid) -> bool {
        let removed = self.projects.write().await.remove(&id).is_some();
        if removed {
            tracing::debug!(project_id = %id, "Project deleted");
        }
        removed
    }

    /// Apply a validated step payload: replace the step's slot, set its
    /// flag, recompute the rate, refresh `updated_at`. Raises the status to
    /// `completed` when the rate reaches 100.
    pub async fn submit_step(
        &self,
        id: Uuid,
        payload: StepPayload,
    ) -> Result<StepSubmission, CoreError> {
        let step = payload.step();
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("Project", id))?;

        let previous_rate = project.completion_rate;
        project.progress.set(step);
        project.steps.put(payload);
        project.completion_rate = completion_rate(&project.progress);
        project.updated_at = Utc::now();

        let just_completed = project.completion_rate == 100 && previous_rate < 100;
        if just_completed {
            project.status = ProjectStatus::Completed;
        }

        tracing::debug!(
            project_id = %id,
            step = step.to_number(),
            completion_rate = project.completion_rate,
            "Step submitted"
        );

        Ok(StepSubmission {
            project: project.clone(),
            just_completed,
        })
    }

    /// Append an accepted upload to the project's step-7 category list.
    pub async fn attach_file(
        &self,
        id: Uuid,
        category: &str,
        attachment: FileAttachment,
    ) -> Result<Project, CoreError> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("Project", id))?;

        let step7 = project.steps.step7.get_or_insert_with(Step7Data::default);
        match step7
            .uploaded_files
            .iter_mut()
            .find(|c| c.category == category)
        {
            Some(entry) => entry.files.push(attachment),
            None => step7.uploaded_files.push(CategoryFiles {
                category: category.to_string(),
                files: vec![attachment],
            }),
        }
        project.updated_at = Utc::now();

        Ok(project.clone())
    }

    /// Remove an upload (by storage path) from the project's file lists.
    /// Returns the removed attachment, or `None` when no list contained it.
    pub async fn detach_file(
        &self,
        id: Uuid,
        path: &str,
    ) -> Result<Option<FileAttachment>, CoreError> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("Project", id))?;

        let Some(step7) = project.steps.step7.as_mut() else {
            return Ok(None);
        };

        for entry in &mut step7.uploaded_files {
            if let Some(pos) = entry.files.iter().position(|f| f.path == path) {
                let removed = entry.files.remove(pos);
                project.updated_at = Utc::now();
                return Ok(Some(removed));
            }
        }
        Ok(None)
    }

    /// Projects qualifying for a staleness reminder at `now`.
    pub async fn stale_projects(&self, now: DateTime<Utc>, stale_after: Duration) -> Vec<Project> {
        self.projects
            .read()
            .await
            .values()
            .filter(|p| is_stale(p, now, stale_after))
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
