use crate::types::{DbId, Version};
use crate::validation::ValidationErrors;

/// Coarse classification of every error the catalog can return.
///
/// Callers (request handlers, retry loops) branch on the kind rather than on
/// concrete variants so new variants can be added without touching them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client input broke one or more field rules. Never reaches the store.
    Validation,
    /// No row matches the requested id.
    NotFound,
    /// The conditional write affected zero rows; re-fetch and retry.
    EditConflict,
    /// Connection failure, timeout, or an internal invariant violation.
    Infrastructure,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Edit conflict: {entity} with id {id} is no longer at version {version}")]
    EditConflict {
        entity: &'static str,
        id: DbId,
        version: Version,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::EditConflict { .. } => ErrorKind::EditConflict,
            CoreError::Internal(_) => ErrorKind::Infrastructure,
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(errors)
    }
}
