//! Fallback handlers for unmatched routes.

use axum::{http::StatusCode, response::IntoResponse, Json};

use super::{ErrorCode, ErrorResponse};

/// 404 fallback for unmatched routes
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            code: ErrorCode::NotFound.code(),
            error: ErrorCode::NotFound.as_str().to_string(),
            message: "The requested endpoint does not exist".to_string(),
            details: None,
        }),
    )
}
