//! Application-level error type raised by the service layer.
//!
//! Business-rule violations are always surfaced as [`AppError`]; everything
//! the repository reports stays wrapped in [`AppError::Repository`] until the
//! HTTP boundary translates it exactly once.

use crate::db::repository::RepositoryError;
use crate::validation::ValidationErrors;

/// Result type for service-layer operations.
pub type AppResult<T> = Result<T, AppError>;

/// Domain error for business-rule and lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Requested entity (or its owner) does not exist for the caller.
    #[error("{0}")]
    NotFound(String),

    /// Request is well-formed but violates a business rule.
    #[error("{0}")]
    BadRequest(String),

    /// Uniqueness or state conflict (duplicate email, duplicate name).
    #[error("{0}")]
    Conflict(String),

    /// Schema validation failed before any domain logic ran.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Persistence collaborator failure, propagated unchanged.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
