//! Per-step payload schemas and validation.
//!
//! Each wizard step has a closed record shape. `StepPayload::parse` decodes
//! the raw JSON for a given step and returns either the typed payload or a
//! `CoreError::Validation` carrying every violated field at once, so the
//! client can surface all problems in a single round trip.
//!
//! Steps 3 and 7 have an explicit skip path: an empty record/file list is
//! valid and still completes the step.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{CoreError, FieldViolation};
use crate::steps::IntakeStep;
use crate::upload::FileAttachment;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-\s().]{10,20}$").expect("phone regex"));

static BUSINESS_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\-]{10,13}$").expect("business number regex"));

// ---------------------------------------------------------------------------
// Step 1: company & contact information
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Step1Data {
    #[validate(nested)]
    pub manager: ManagerContact,
    #[validate(nested)]
    pub company: CompanyProfile,
}

/// The client-side contact running the intake.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ManagerContact {
    #[validate(length(min = 2, message = "manager name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "position is required"))]
    pub position: String,
    #[validate(regex(path = *PHONE_RE, message = "phone number must be at least 10 digits"))]
    pub phone: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
}

/// Company details shown in the site footer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompanyProfile {
    #[validate(length(min = 2, message = "company name is required"))]
    pub name: String,
    #[validate(length(min = 2, message = "representative name is required"))]
    pub representative: String,
    #[validate(length(min = 10, message = "address must be at least 10 characters"))]
    pub address: String,
    #[validate(regex(path = *BUSINESS_NUMBER_RE, message = "business registration number is invalid"))]
    pub business_number: String,
    #[validate(regex(path = *PHONE_RE, message = "phone number must be at least 10 digits"))]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
}

// ---------------------------------------------------------------------------
// Step 2: hosting & domain credentials
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Step2Data {
    #[validate(nested)]
    pub hosting: HostingAccount,
    #[validate(nested)]
    pub domain: DomainAccount,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HostingAccount {
    #[validate(length(min = 1, message = "hosting provider is required"))]
    pub provider: String,
    #[validate(length(min = 1, message = "hosting account id is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "hosting password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "FTP/DB password is required"))]
    pub ftp_db_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DomainAccount {
    #[validate(length(min = 1, message = "domain registrar is required"))]
    pub provider: String,
    #[validate(length(min = 1, message = "domain address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "domain account id is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "domain password is required"))]
    pub password: String,
}

// ---------------------------------------------------------------------------
// Step 3: mail DNS records (skippable)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Step3Data {
    /// Empty list is the explicit "portal mail, skip this step" path.
    #[serde(default)]
    #[validate(nested)]
    pub mail_records: Vec<MailRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MailRecord {
    pub record_type: MailRecordType,
    #[validate(length(min = 1, message = "record host is required"))]
    pub host: String,
    #[validate(length(min = 1, message = "record value is required"))]
    pub value: String,
    /// Required for MX records, ignored for the rest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MailRecordType {
    Mx,
    Cname,
    Txt,
}

// ---------------------------------------------------------------------------
// Step 4: SEO credentials & site metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Step4Data {
    #[validate(nested)]
    pub google: PortalCredentials,
    #[validate(nested)]
    pub naver: PortalCredentials,
    #[validate(nested)]
    pub site_info: SiteInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PortalCredentials {
    #[validate(length(min = 1, message = "account id is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SiteInfo {
    #[validate(length(min = 1, message = "site title is required"))]
    pub title: String,
    #[validate(length(min = 10, message = "site description must be at least 10 characters"))]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Step 5: design references
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Step5Data {
    #[validate(length(min = 1, message = "at least one reference is required"), nested)]
    pub references: Vec<DesignReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DesignReference {
    #[validate(length(min = 1, message = "reference site is required"))]
    pub site: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    #[validate(length(min = 1, message = "reference description is required"))]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Step 6: sitemap / menu structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Step6Data {
    #[validate(nested)]
    pub menu_structure: MenuStructure,
}

/// Two-level menu: ordered primary entries, each optionally mapping to a
/// list of secondary entries.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuStructure {
    #[validate(length(min = 1, message = "at least one primary menu entry is required"))]
    pub primary_menu: Vec<String>,
    #[serde(default)]
    pub secondary_menu: HashMap<String, Vec<String>>,
}

// ---------------------------------------------------------------------------
// Step 7: uploaded website assets (skippable)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Step7Data {
    /// Empty list is the explicit skip path.
    #[serde(default)]
    #[validate(nested)]
    pub uploaded_files: Vec<CategoryFiles>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryFiles {
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[serde(default)]
    pub files: Vec<FileAttachment>,
}

// ---------------------------------------------------------------------------
// StepPayload
// ---------------------------------------------------------------------------

/// A validated payload for exactly one wizard step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPayload {
    CompanyInfo(Step1Data),
    HostingDomain(Step2Data),
    MailRecords(Step3Data),
    SeoSetup(Step4Data),
    DesignReferences(Step5Data),
    Sitemap(Step6Data),
    WebsiteAssets(Step7Data),
}

impl StepPayload {
    /// Decode and validate raw JSON against the schema for `step`.
    ///
    /// All constraint violations are collected and returned together; a
    /// payload that fails to deserialize at all reports a single `payload`
    /// violation with the decoder message.
    pub fn parse(step: IntakeStep, raw: serde_json::Value) -> Result<Self, CoreError> {
        match step {
            IntakeStep::CompanyInfo => {
                let data: Step1Data = decode(raw)?;
                finish(violations_of(&data), Self::CompanyInfo(data))
            }
            IntakeStep::HostingDomain => {
                let data: Step2Data = decode(raw)?;
                finish(violations_of(&data), Self::HostingDomain(data))
            }
            IntakeStep::MailRecords => {
                let data: Step3Data = decode(raw)?;
                let mut violations = violations_of(&data);
                collect_mx_priority(&data, &mut violations);
                finish(violations, Self::MailRecords(data))
            }
            IntakeStep::SeoSetup => {
                let data: Step4Data = decode(raw)?;
                finish(violations_of(&data), Self::SeoSetup(data))
            }
            IntakeStep::DesignReferences => {
                let data: Step5Data = decode(raw)?;
                finish(violations_of(&data), Self::DesignReferences(data))
            }
            IntakeStep::Sitemap => {
                let data: Step6Data = decode(raw)?;
                let mut violations = violations_of(&data);
                collect_empty_menu_entries(&data, &mut violations);
                finish(violations, Self::Sitemap(data))
            }
            IntakeStep::WebsiteAssets => {
                let data: Step7Data = decode(raw)?;
                finish(violations_of(&data), Self::WebsiteAssets(data))
            }
        }
    }

    /// The step this payload belongs to.
    pub fn step(&self) -> IntakeStep {
        match self {
            Self::CompanyInfo(_) => IntakeStep::CompanyInfo,
            Self::HostingDomain(_) => IntakeStep::HostingDomain,
            Self::MailRecords(_) => IntakeStep::MailRecords,
            Self::SeoSetup(_) => IntakeStep::SeoSetup,
            Self::DesignReferences(_) => IntakeStep::DesignReferences,
            Self::Sitemap(_) => IntakeStep::Sitemap,
            Self::WebsiteAssets(_) => IntakeStep::WebsiteAssets,
        }
    }
}

fn decode<T: DeserializeOwned>(raw: serde_json::Value) -> Result<T, CoreError> {
    serde_json::from_value(raw).map_err(|e| CoreError::invalid_field("payload", e.to_string()))
}

fn finish(violations: Vec<FieldViolation>, payload: StepPayload) -> Result<StepPayload, CoreError> {
    if violations.is_empty() {
        Ok(payload)
    } else {
        Err(CoreError::Validation(violations))
    }
}

/// MX records must carry a numeric priority; the derive cannot see across
/// fields, so the rule is appended here.
fn collect_mx_priority(data: &Step3Data, out: &mut Vec<FieldViolation>) {
    for (index, record) in data.mail_records.iter().enumerate() {
        if record.record_type == MailRecordType::Mx && record.priority.is_none() {
            out.push(FieldViolation {
                field: format!("mail_records[{index}].priority"),
                reason: "MX records require a numeric priority".to_string(),
            });
        }
    }
}

/// Primary menu entries must be non-blank strings.
fn collect_empty_menu_entries(data: &Step6Data, out: &mut Vec<FieldViolation>) {
    for (index, entry) in data.menu_structure.primary_menu.iter().enumerate() {
        if entry.trim().is_empty() {
            out.push(FieldViolation {
                field: format!("menu_structure.primary_menu[{index}]"),
                reason: "menu entry must not be empty".to_string(),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Violation flattening
// ---------------------------------------------------------------------------

/// Run the derive validators and flatten the nested error tree into dotted
/// field paths, sorted for a stable response order.
pub fn violations_of<T: Validate>(value: &T) -> Vec<FieldViolation> {
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => {
            let mut out = Vec::new();
            collect(&errors, "", &mut out);
            out.sort_by(|a, b| a.field.cmp(&b.field));
            out
        }
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(violations) => {
                for violation in violations {
                    let reason = violation
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| violation.code.to_string());
                    out.push(FieldViolation {
                        field: path.clone(),
                        reason,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(step: u8, raw: serde_json::Value) -> Result<StepPayload, CoreError> {
        StepPayload::parse(IntakeStep::from_number(step).unwrap(), raw)
    }

    fn violation_fields(err: CoreError) -> Vec<String> {
        match err {
            CoreError::Validation(violations) => {
                violations.into_iter().map(|v| v.field).collect()
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    fn valid_step1() -> serde_json::Value {
        json!({
            "manager": {
                "name": "Jane Doe",
                "position": "Marketing Lead",
                "phone": "010-1234-5678",
                "email": "jane@example.com"
            },
            "company": {
                "name": "Acme Industries",
                "representative": "John Smith",
                "address": "25 Beopwon-ro 11-gil, Songpa-gu, Seoul",
                "business_number": "123-45-67890",
                "phone": "02-402-2589-0",
                "email": "info@example.com"
            }
        })
    }

    // -- step 1 --

    #[test]
    fn step1_valid_payload_parses() {
        assert!(parse(1, valid_step1()).is_ok());
    }

    #[test]
    fn step1_collects_every_violation() {
        let raw = json!({
            "manager": {
                "name": "J",
                "position": "",
                "phone": "123",
                "email": "not-an-email"
            },
            "company": {
                "name": "Acme Industries",
                "representative": "John Smith",
                "address": "25 Beopwon-ro 11-gil, Songpa-gu, Seoul",
                "business_number": "123-45-67890",
                "phone": "02-402-2589-0",
                "email": "info@example.com"
            }
        });
        let fields = violation_fields(parse(1, raw).unwrap_err());
        assert_eq!(
            fields,
            vec![
                "manager.email",
                "manager.name",
                "manager.phone",
                "manager.position",
            ]
        );
    }

    // -- step 2 --

    fn valid_step2() -> serde_json::Value {
        json!({
            "hosting": {
                "provider": "Cafe24",
                "username": "acme",
                "password": "hunter2",
                "ftp_db_password": "hunter3"
            },
            "domain": {
                "provider": "Gabia",
                "address": "acme.example",
                "username": "acme",
                "password": "hunter4"
            }
        })
    }

    #[test]
    fn step2_valid_payload_parses() {
        assert!(parse(2, valid_step2()).is_ok());
    }

    #[test]
    fn step2_empty_provider_names_dotted_field() {
        let mut raw = valid_step2();
        raw["hosting"]["provider"] = json!("");
        let fields = violation_fields(parse(2, raw).unwrap_err());
        assert_eq!(fields, vec!["hosting.provider"]);
    }

    // -- step 3 --

    #[test]
    fn step3_empty_records_is_the_skip_path() {
        assert!(parse(3, json!({ "mail_records": [] })).is_ok());
        assert!(parse(3, json!({})).is_ok());
    }

    #[test]
    fn step3_valid_records_parse() {
        let raw = json!({
            "mail_records": [
                { "record_type": "MX", "host": "@", "value": "mail.acme.example", "priority": 10 },
                { "record_type": "CNAME", "host": "mail", "value": "acme.example" },
                { "record_type": "TXT", "host": "@", "value": "v=spf1 include:_spf.example.com ~all" }
            ]
        });
        assert!(parse(3, raw).is_ok());
    }

    #[test]
    fn step3_mx_without_priority_is_rejected() {
        let raw = json!({
            "mail_records": [
                { "record_type": "MX", "host": "@", "value": "mail.acme.example" }
            ]
        });
        let fields = violation_fields(parse(3, raw).unwrap_err());
        assert_eq!(fields, vec!["mail_records[0].priority"]);
    }

    #[test]
    fn step3_indexes_violations_per_record() {
        let raw = json!({
            "mail_records": [
                { "record_type": "CNAME", "host": "mail", "value": "acme.example" },
                { "record_type": "TXT", "host": "", "value": "" }
            ]
        });
        let fields = violation_fields(parse(3, raw).unwrap_err());
        assert_eq!(fields, vec!["mail_records[1].host", "mail_records[1].value"]);
    }

    #[test]
    fn step3_unknown_record_type_fails_decode() {
        let raw = json!({
            "mail_records": [
                { "record_type": "SRV", "host": "@", "value": "x" }
            ]
        });
        let fields = violation_fields(parse(3, raw).unwrap_err());
        assert_eq!(fields, vec!["payload"]);
    }

    // -- step 4 --

    #[test]
    fn step4_short_description_is_rejected() {
        let raw = json!({
            "google": { "username": "acme", "password": "pw" },
            "naver": { "username": "acme", "password": "pw" },
            "site_info": { "title": "Acme", "description": "too short" }
        });
        let fields = violation_fields(parse(4, raw).unwrap_err());
        assert_eq!(fields, vec!["site_info.description"]);
    }

    // -- step 5 --

    #[test]
    fn step5_requires_at_least_one_reference() {
        let fields = violation_fields(parse(5, json!({ "references": [] })).unwrap_err());
        assert_eq!(fields, vec!["references"]);
    }

    #[test]
    fn step5_valid_reference_parses() {
        let raw = json!({
            "references": [
                { "site": "https://example.com", "description": "clean layout" }
            ]
        });
        assert!(parse(5, raw).is_ok());
    }

    // -- step 6 --

    #[test]
    fn step6_requires_primary_menu() {
        let raw = json!({ "menu_structure": { "primary_menu": [] } });
        let fields = violation_fields(parse(6, raw).unwrap_err());
        assert_eq!(fields, vec!["menu_structure.primary_menu"]);
    }

    #[test]
    fn step6_rejects_blank_menu_entries() {
        let raw = json!({
            "menu_structure": {
                "primary_menu": ["ABOUT US", "  ", "CONTACT"],
                "secondary_menu": { "ABOUT US": ["History", "Directions"] }
            }
        });
        let fields = violation_fields(parse(6, raw).unwrap_err());
        assert_eq!(fields, vec!["menu_structure.primary_menu[1]"]);
    }

    // -- step 7 --

    #[test]
    fn step7_empty_upload_list_is_the_skip_path() {
        assert!(parse(7, json!({ "uploaded_files": [] })).is_ok());
        assert!(parse(7, json!({})).is_ok());
    }

    #[test]
    fn step7_blank_category_is_rejected() {
        let raw = json!({
            "uploaded_files": [
                { "category": "", "files": [] }
            ]
        });
        let fields = violation_fields(parse(7, raw).unwrap_err());
        assert_eq!(fields, vec!["uploaded_files[0].category"]);
    }

    // -- misc --

    #[test]
    fn non_object_payload_reports_decode_violation() {
        let fields = violation_fields(parse(1, json!("nope")).unwrap_err());
        assert_eq!(fields, vec!["payload"]);
    }

    #[test]
    fn payload_knows_its_step() {
        let payload = parse(3, json!({})).unwrap();
        assert_eq!(payload.step(), IntakeStep::MailRecords);
    }
}
