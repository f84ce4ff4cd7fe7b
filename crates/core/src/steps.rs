//! The seven fixed stages of the intake wizard.
//!
//! Step numbers are 1-based and strictly ordered; every step also carries a
//! display title (used in notification bodies) and the numbered folder name
//! used for staged data and the NAS mirror.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 7;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 7;

/// One stage of the seven-step intake wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    CompanyInfo,
    HostingDomain,
    MailRecords,
    SeoSetup,
    DesignReferences,
    Sitemap,
    WebsiteAssets,
}

impl IntakeStep {
    /// All steps in wizard order.
    pub const ALL: [IntakeStep; TOTAL_STEPS as usize] = [
        Self::CompanyInfo,
        Self::HostingDomain,
        Self::MailRecords,
        Self::SeoSetup,
        Self::DesignReferences,
        Self::Sitemap,
        Self::WebsiteAssets,
    ];

    /// Convert a 1-based step number to an `IntakeStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::CompanyInfo),
            2 => Ok(Self::HostingDomain),
            3 => Ok(Self::MailRecords),
            4 => Ok(Self::SeoSetup),
            5 => Ok(Self::DesignReferences),
            6 => Ok(Self::Sitemap),
            7 => Ok(Self::WebsiteAssets),
            _ => Err(CoreError::invalid_field(
                "step",
                format!("invalid step number {n}, must be between {MIN_STEP} and {MAX_STEP}"),
            )),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::CompanyInfo => 1,
            Self::HostingDomain => 2,
            Self::MailRecords => 3,
            Self::SeoSetup => 4,
            Self::DesignReferences => 5,
            Self::Sitemap => 6,
            Self::WebsiteAssets => 7,
        }
    }

    /// Human-readable title, as used in notification emails.
    pub fn title(self) -> &'static str {
        match self {
            Self::CompanyInfo => "Company & Contact Information",
            Self::HostingDomain => "Hosting & Domain",
            Self::MailRecords => "Mail Records",
            Self::SeoSetup => "SEO Setup",
            Self::DesignReferences => "Design References",
            Self::Sitemap => "Sitemap",
            Self::WebsiteAssets => "Website Assets",
        }
    }

    /// Numbered folder name used in the staging area and on the NAS share.
    pub fn folder_name(self) -> &'static str {
        match self {
            Self::CompanyInfo => "01_company_info",
            Self::HostingDomain => "02_hosting_domain",
            Self::MailRecords => "03_mail_records",
            Self::SeoSetup => "04_seo",
            Self::DesignReferences => "05_design_references",
            Self::Sitemap => "06_sitemap",
            Self::WebsiteAssets => "07_website_assets",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
