use serde::Serialize;

/// A single violated constraint on a submitted payload.
///
/// `field` is a dotted path into the payload (`hosting.provider`,
/// `mail_records[0].priority`) so the client can attach the message to the
/// right input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("validation failed: {} field(s) rejected", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("file too large: {size} bytes (limit {max})")]
    TooLarge { size: u64, max: u64 },

    #[error("unsupported file type: {content_type}")]
    UnsupportedType { content_type: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl CoreError {
    /// Shorthand for a `NotFound` with any displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation {
            field: field.into(),
            reason: reason.into(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_entity_and_id() {
        let err = CoreError::not_found("Project", "abc-123");
        assert_eq!(err.to_string(), "Project not found: abc-123");
    }

    #[test]
    fn validation_display_counts_fields() {
        let err = CoreError::Validation(vec![
            FieldViolation {
                field: "a".into(),
                reason: "r".into(),
            },
            FieldViolation {
                field: "b".into(),
                reason: "r".into(),
            },
        ]);
        assert_eq!(err.to_string(), "validation failed: 2 field(s) rejected");
    }
}
