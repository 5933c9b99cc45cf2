use std::time::Duration;

use marquee_core::error::{CoreError, ErrorKind};

/// Log target for invariant violations, kept apart from ordinary failures.
pub const INVARIANT_TARGET: &str = "marquee_db::invariant";

/// Errors returned by the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain-level error (validation, not found, edit conflict).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Connection, protocol or statement failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// The operation did not finish within its time budget.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// The store returned data it should never have accepted.
    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Core(core) => core.kind(),
            StoreError::Database(_)
            | StoreError::Timeout { .. }
            | StoreError::InternalInvariantViolation(_) => ErrorKind::Infrastructure,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                tracing::error!(
                    target: INVARIANT_TARGET,
                    error = %err,
                    "Stored row failed to decode"
                );
                StoreError::InternalInvariantViolation(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

impl From<marquee_core::validation::ValidationErrors> for StoreError {
    fn from(errors: marquee_core::validation::ValidationErrors) -> Self {
        StoreError::Core(CoreError::Validation(errors))
    }
}
