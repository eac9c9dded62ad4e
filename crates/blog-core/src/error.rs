//! Repository-level error types.

use thiserror::Error;

use crate::domain::FieldErrors;

/// Errors surfaced by repositories.
///
/// `NotFound` and `Validation` are expected outcomes callers branch on;
/// the rest are infrastructure failures.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepoError {
    pub fn not_found(entity_type: &'static str, id: i32) -> Self {
        RepoError::NotFound { entity_type, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound { .. })
    }
}

impl From<FieldErrors> for RepoError {
    fn from(errors: FieldErrors) -> Self {
        RepoError::Validation(errors)
    }
}
