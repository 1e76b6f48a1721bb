//! Error types for governance operations.
//!
//! Three caller-visible kinds: structural validation failures (field-level,
//! collected in full before returning), missing resources, and business
//! rule violations (authorization, lifecycle, publish preconditions). A
//! fourth variant wraps storage failures.

use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;

/// A single field-level validation violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type for service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Structural validation failed. Carries every violation found, never
    /// just the first.
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// A referenced resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Authorization failure, invalid lifecycle transition, missing
    /// workflow comment/reason or violated publish precondition.
    #[error("{0}")]
    BusinessRule(String),

    /// Storage layer failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule(message.into())
    }

    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

pub fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_all_fields() {
        let err = ServiceError::Validation(vec![
            FieldError::new("title", "Title is required", "required"),
            FieldError::new("end_date", "End date precedes start date", "date_range"),
        ]);
        let text = err.to_string();
        assert!(text.contains("title"));
        assert!(text.contains("end_date"));
    }

    #[test]
    fn test_not_found_display() {
        let err = ServiceError::not_found("facility", "f-1");
        assert_eq!(err.to_string(), "facility not found: f-1");
    }

    #[test]
    fn test_repository_error_passthrough() {
        let err: ServiceError = RepositoryError::query("boom").into();
        assert_eq!(err.to_string(), "Query error: boom");
    }
}
