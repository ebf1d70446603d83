//! Domain errors

use std::fmt;

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error types
///
/// `NotFound` deliberately covers both "absent" and "present but the caller
/// may not know it exists", so ownership checks never leak another user's
/// records through a distinct error kind.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("cannot {action} while {status}")]
    InvalidStatusTransition {
        action: &'static str,
        status: String,
    },

    #[error("{0}")]
    Validation(ValidationFailures),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Field-level validation failures, collected before any repository call.
#[derive(Debug, Clone, Default)]
pub struct ValidationFailures {
    pub fields: Vec<FieldFailure>,
}

#[derive(Debug, Clone)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return write!(f, "validation failed");
        }
        let details: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "validation failed: {}", details.join("; "))
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{:?}", e.code));
                    FieldFailure {
                        field: field.to_string(),
                        message,
                    }
                })
            })
            .collect();

        DomainError::Validation(ValidationFailures { fields })
    }
}
