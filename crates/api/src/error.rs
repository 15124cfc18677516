use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use shotflow_core::error::CoreError;
use shotflow_pipeline::PipelineError;
use shotflow_store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the pipeline's error taxonomy and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Pipeline(PipelineError::Core(err))
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Pipeline(pipeline) => classify_pipeline_error(pipeline),
            AppError::Store(store) => classify_store_error(store),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_pipeline_error(err: &PipelineError) -> (StatusCode, &'static str, String) {
    match err {
        PipelineError::Core(core) => match core {
            CoreError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            CoreError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            CoreError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal core error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        },
        PipelineError::Store(store) => classify_store_error(store),
        // The attempt failed; the unit is already marked Failed and the
        // message tells the user how to proceed.
        PipelineError::Generation { message } => {
            (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", message.clone())
        }
        PipelineError::Authorization { message } => {
            (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", message.clone())
        }
        // The credential collaborator handled the failure; no error toast.
        PipelineError::CredentialsHandled => (
            StatusCode::CONFLICT,
            "CREDENTIALS_REFRESHED",
            "The operation was interrupted for credential renewal; retry it".to_string(),
        ),
    }
}

fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::ProjectNotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Project {id} not found"),
        ),
        StoreError::ShotNotFound { shot_id, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Shot {shot_id} not found"),
        ),
        StoreError::Io(io) => {
            tracing::error!(error = %io, "Snapshot I/O error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        StoreError::Serialization(serde) => {
            tracing::error!(error = %serde, "Snapshot serialization error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
