use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    Inactive,

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Email delivery error: {0}")]
    Email(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound("User not found".to_string()),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Conflict(msg) => AppError::Conflict(msg),
            // Identical message for unknown email and wrong password
            UserError::InvalidCredentials | UserError::Inactive => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            UserError::Forbidden(msg) => AppError::Forbidden(msg),
            UserError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
            UserError::Email(msg) => {
                AppError::InternalServerError(format!("Email delivery error: {}", msg))
            }
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        UserError::Database(err.to_string())
    }
}
