//! The project record and its create/update inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use regex::Regex;

use crate::payload::{
    Step1Data, Step2Data, Step3Data, Step4Data, Step5Data, Step6Data, Step7Data, StepPayload,
};
use crate::steps::IntakeStep;

static CONTACT_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-\s().]{10,20}$").expect("phone regex"));

/// Lifecycle status of a project.
///
/// The completion percentage derived from the step flags is authoritative;
/// the store raises `Completed` when the rate reaches 100, while `Paused`
/// and `Active` remain operator-settable through the shallow update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
    Paused,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }
}

/// Per-step completion flags, one per wizard step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    pub step1: bool,
    pub step2: bool,
    pub step3: bool,
    pub step4: bool,
    pub step5: bool,
    pub step6: bool,
    pub step7: bool,
}

impl StepProgress {
    /// Flags in wizard order.
    pub fn flags(&self) -> [bool; 7] {
        [
            self.step1, self.step2, self.step3, self.step4, self.step5, self.step6, self.step7,
        ]
    }

    pub fn flag(&self, step: IntakeStep) -> bool {
        self.flags()[(step.to_number() - 1) as usize]
    }

    pub fn set(&mut self, step: IntakeStep) {
        match step {
            IntakeStep::CompanyInfo => self.step1 = true,
            IntakeStep::HostingDomain => self.step2 = true,
            IntakeStep::MailRecords => self.step3 = true,
            IntakeStep::SeoSetup => self.step4 = true,
            IntakeStep::DesignReferences => self.step5 = true,
            IntakeStep::Sitemap => self.step6 = true,
            IntakeStep::WebsiteAssets => self.step7 = true,
        }
    }

    pub fn completed_count(&self) -> u8 {
        self.flags().iter().filter(|f| **f).count() as u8
    }
}

/// The seven optional step payload slots. Each slot is replaced wholesale
/// when its step is re-submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step1: Option<Step1Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step2: Option<Step2Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step3: Option<Step3Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step4: Option<Step4Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step5: Option<Step5Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step6: Option<Step6Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step7: Option<Step7Data>,
}

impl StepData {
    /// Replace the slot for the payload's step.
    pub fn put(&mut self, payload: StepPayload) {
        match payload {
            StepPayload::CompanyInfo(data) => self.step1 = Some(data),
            StepPayload::HostingDomain(data) => self.step2 = Some(data),
            StepPayload::MailRecords(data) => self.step3 = Some(data),
            StepPayload::SeoSetup(data) => self.step4 = Some(data),
            StepPayload::DesignReferences(data) => self.step5 = Some(data),
            StepPayload::Sitemap(data) => self.step6 = Some(data),
            StepPayload::WebsiteAssets(data) => self.step7 = Some(data),
        }
    }
}

/// The central entity: one client intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub company_name: String,
    pub manager_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: ProjectStatus,
    pub progress: StepProgress,
    /// Always `round(100 * completed_steps / 7)`.
    pub completion_rate: u8,
    pub steps: StepData,
}

impl Project {
    /// First 8 hex characters of the id, used in staged folder names.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// Validated input for project creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProject {
    #[validate(length(min = 2, message = "company name is required"))]
    pub company_name: String,
    #[validate(length(min = 2, message = "manager name is required"))]
    pub manager_name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(regex(path = *CONTACT_PHONE_RE, message = "phone number must be at least 10 digits"))]
    pub phone: String,
}

/// Shallow update for a project: only the provided fields are replaced,
/// and `updated_at` is always refreshed by the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub company_name: Option<String>,
    pub manager_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<ProjectStatus>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
