use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marquee_core::error::{CoreError, ErrorKind};
use marquee_core::validation::ValidationErrors;
use marquee_db::StoreError;
use serde_json::{json, Map, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`StoreError`] and [`CoreError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error from the movie store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A domain-level error raised outside the store.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A path that cannot name any resource.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Store(err) => err.kind(),
            AppError::Core(err) => err.kind(),
            AppError::BadRequest(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    fn core(&self) -> Option<&CoreError> {
        match self {
            AppError::Store(StoreError::Core(core)) | AppError::Core(core) => Some(core),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest(msg) => {
                return error_body(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None);
            }
            AppError::NotFound(msg) => {
                return error_body(StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None);
            }
            _ => {}
        }

        match (self.kind(), self.core()) {
            (ErrorKind::Validation, Some(CoreError::Validation(errors))) => error_body(
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "One or more fields failed validation".to_string(),
                Some(violations_map(errors)),
            ),
            (ErrorKind::NotFound, Some(CoreError::NotFound { entity, id })) => error_body(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
                None,
            ),
            (ErrorKind::EditConflict, _) => error_body(
                StatusCode::CONFLICT,
                "EDIT_CONFLICT",
                "Unable to update the record due to an edit conflict, please try again"
                    .to_string(),
                None,
            ),
            _ => {
                tracing::error!(error = %self, "Internal error");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        }
    }
}

/// Malformed or mistyped request bodies are client errors, reported in the
/// same JSON envelope as every other failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

fn violations_map(errors: &ValidationErrors) -> Value {
    let map: Map<String, Value> = errors
        .violations()
        .iter()
        .map(|v| (v.field.clone(), Value::String(v.message.clone())))
        .collect();
    Value::Object(map)
}

fn error_body(
    status: StatusCode,
    code: &'static str,
    message: String,
    violations: Option<Value>,
) -> Response {
    let mut body = json!({
        "error": message,
        "code": code,
    });
    if let Some(violations) = violations {
        body["violations"] = violations;
    }
    (status, axum::Json(body)).into_response()
}
