use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid export request: {0}")]
    Validation(String),

    #[error("No unbilled records found for selected period")]
    NoRecords,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to render export file: {0}")]
    Render(String),

    #[error("Artifact storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Validation(msg) => AppError::BadRequest(msg),
            ExportError::NoRecords => {
                AppError::BadRequest("No unbilled records found for selected period".to_string())
            }
            ExportError::NotFound(msg) => AppError::NotFound(msg),
            ExportError::Render(msg) => {
                AppError::InternalServerError(format!("Export rendering failed: {}", msg))
            }
            ExportError::Storage(msg) => {
                AppError::InternalServerError(format!("Artifact storage error: {}", msg))
            }
            ExportError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for ExportError {
    fn from(err: sea_orm::DbErr) -> Self {
        ExportError::Database(err.to_string())
    }
}

impl From<object_store::Error> for ExportError {
    fn from(err: object_store::Error) -> Self {
        ExportError::Storage(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Render(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Render(err.to_string())
    }
}
