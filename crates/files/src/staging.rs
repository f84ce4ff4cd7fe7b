//! Staged step-data snapshots.
//!
//! Every project gets a folder named `<company>_<YYYY-MM-DD>_<shortid>`
//! containing the seven numbered step folders; each successful step
//! submission drops a `step<N>_data.json` snapshot into its folder. Both
//! the scaffold and the snapshots are replayed against the NAS mirror on a
//! best-effort basis.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use intake_core::{IntakeStep, Project};

use crate::mirror::NasMirror;
use crate::FileStoreError;

/// Snapshot area rooted at the configured staging directory.
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Folder name for a project: sanitized company name, creation date,
    /// first 8 characters of the id.
    pub fn project_folder_name(project: &Project) -> String {
        format!(
            "{}_{}_{}",
            sanitize_folder(&project.company_name),
            project.created_at.format("%Y-%m-%d"),
            project.short_id(),
        )
    }

    /// Create the project folder and all seven step folders, locally and on
    /// the mirror. Mirror failures are logged and ignored.
    pub async fn scaffold_project(
        &self,
        project: &Project,
        mirror: &dyn NasMirror,
    ) -> Result<(), FileStoreError> {
        let base = Self::project_folder_name(project);
        for step in IntakeStep::ALL {
            let relative = PathBuf::from(&base).join(step.folder_name());
            tokio::fs::create_dir_all(self.root.join(&relative)).await?;
            if let Err(e) = mirror.ensure_dir(&relative).await {
                tracing::warn!(
                    error = %e,
                    path = %relative.display(),
                    "NAS scaffold failed, continuing with local staging"
                );
            }
        }
        tracing::debug!(folder = %base, "Staging folders created");
        Ok(())
    }

    /// Write the snapshot for one submitted step and mirror it.
    ///
    /// Returns the relative snapshot path.
    pub async fn write_step_snapshot(
        &self,
        project: &Project,
        step: IntakeStep,
        data: &serde_json::Value,
    ) -> Result<PathBuf, FileStoreError> {
        let snapshot = json!({
            "project_id": project.id,
            "step": step.to_number(),
            "data": data,
            "saved_at": Utc::now(),
        });
        let bytes = serde_json::to_vec_pretty(&snapshot).map_err(|e| {
            FileStoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        let relative = PathBuf::from(Self::project_folder_name(project))
            .join(step.folder_name())
            .join(snapshot_file_name(step));

        let dest = self.root.join(&relative);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, &bytes).await?;
        tracing::debug!(path = %relative.display(), "Step snapshot written");

        Ok(relative)
    }

    /// Write and mirror in one call; the mirror leg is best-effort.
    pub async fn snapshot_and_mirror(
        &self,
        project: &Project,
        step: IntakeStep,
        data: &serde_json::Value,
        mirror: &dyn NasMirror,
    ) -> Result<(), FileStoreError> {
        let relative = self.write_step_snapshot(project, step, data).await?;
        let bytes = tokio::fs::read(self.root.join(&relative)).await?;
        if let Err(e) = mirror.write(&relative, &bytes).await {
            tracing::warn!(
                error = %e,
                path = %relative.display(),
                "NAS snapshot mirror failed"
            );
        }
        Ok(())
    }
}

fn snapshot_file_name(step: IntakeStep) -> String {
    format!("step{}_data.json", step.to_number())
}

/// Keep folder names shell- and share-friendly: alphanumerics, dash and
/// underscore survive, everything else becomes an underscore.
fn sanitize_folder(name: &str) -> String {
    let mapped: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if mapped.is_empty() {
        "project".to_string()
    } else {
        mapped
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::{MountedShareMirror, NoopMirror};
    use chrono::TimeZone;
    use intake_core::{ProjectStatus, StepData, StepProgress};
    use serde_json::Value;

    fn project() -> Project {
        let created = chrono::Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap();
        Project {
            id: Uuid::parse_str("ab12cd34-0000-4000-8000-000000000000").unwrap(),
            company_name: "Acme Industries".into(),
            manager_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "010-1234-5678".into(),
            created_at: created,
            updated_at: created,
            status: ProjectStatus::Active,
            progress: StepProgress::default(),
            completion_rate: 0,
            steps: StepData::default(),
        }
    }

    #[test]
    fn folder_name_combines_company_date_and_short_id() {
        assert_eq!(
            StagingArea::project_folder_name(&project()),
            "Acme_Industries_2026-08-05_ab12cd34"
        );
    }

    #[test]
    fn folder_name_sanitizes_awkward_company_names() {
        let mut p = project();
        p.company_name = "A/B:C co. ".into();
        assert_eq!(
            StagingArea::project_folder_name(&p),
            "A_B_C_co__2026-08-05_ab12cd34"
        );
    }

    #[tokio::test]
    async fn scaffold_creates_all_step_folders() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path());
        staging.scaffold_project(&project(), &NoopMirror).await.unwrap();

        for step in IntakeStep::ALL {
            let path = dir
                .path()
                .join("Acme_Industries_2026-08-05_ab12cd34")
                .join(step.folder_name());
            assert!(path.is_dir(), "{path:?}");
        }
    }

    #[tokio::test]
    async fn snapshot_lands_in_the_step_folder() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path());

        let relative = staging
            .write_step_snapshot(
                &project(),
                IntakeStep::MailRecords,
                &serde_json::json!({ "mail_records": [] }),
            )
            .await
            .unwrap();

        assert_eq!(
            relative,
            PathBuf::from("Acme_Industries_2026-08-05_ab12cd34/03_mail_records/step3_data.json")
        );

        let content = tokio::fs::read(dir.path().join(&relative)).await.unwrap();
        let parsed: Value = serde_json::from_slice(&content).unwrap();
        assert_eq!(parsed["step"], 3);
        assert_eq!(parsed["data"]["mail_records"], serde_json::json!([]));
        assert!(parsed["saved_at"].is_string());
    }

    #[tokio::test]
    async fn snapshot_is_mirrored() {
        let local = tempfile::tempdir().unwrap();
        let share = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(local.path());
        let mirror = MountedShareMirror::new(share.path());

        staging
            .snapshot_and_mirror(
                &project(),
                IntakeStep::CompanyInfo,
                &serde_json::json!({ "ok": true }),
                &mirror,
            )
            .await
            .unwrap();

        let mirrored = share
            .path()
            .join("Acme_Industries_2026-08-05_ab12cd34/01_company_info/step1_data.json");
        assert!(mirrored.is_file());
    }
}
