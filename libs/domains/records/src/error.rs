use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Service record not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Billed records cannot be edited")]
    BilledImmutable,

    #[error("Database error: {0}")]
    Database(String),
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Convert RecordError to AppError for standardized error responses
impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound(id) => {
                AppError::NotFound(format!("Service record {} not found", id))
            }
            RecordError::Validation(msg) => AppError::BadRequest(msg),
            RecordError::Forbidden(msg) => AppError::Forbidden(msg),
            RecordError::BilledImmutable => {
                AppError::Forbidden("Billed records cannot be edited".to_string())
            }
            RecordError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for RecordError {
    fn from(err: sea_orm::DbErr) -> Self {
        RecordError::Database(err.to_string())
    }
}
