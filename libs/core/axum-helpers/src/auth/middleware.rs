use super::jwt::{JwtAuth, JwtClaims, TOKEN_COOKIE};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Extract JWT from Authorization header or cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    // Try Authorization header first: "Bearer <token>"
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
        .or_else(|| {
            // Fallback to cookie: "access_token=<token>"
            headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let parts: Vec<&str> = cookie.trim().splitn(2, '=').collect();
                        if parts.len() == 2 && parts[0] == TOKEN_COOKIE {
                            Some(parts[1].to_string())
                        } else {
                            None
                        }
                    })
                })
        })
}

/// JWT authentication middleware
///
/// Validates JWT tokens from the Authorization header or cookies and inserts
/// [`JwtClaims`] into request extensions on success.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
/// use axum_helpers::{jwt_auth_middleware, JwtAuth};
///
/// let protected = Router::new()
///     .route("/me", get(me_handler))
///     .layer(middleware::from_fn_with_state(auth.clone(), jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match extract_token_from_request(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No JWT found in Authorization header or cookie");
            return Err(AppError::Unauthorized("Authentication required".to_string()));
        }
    };

    let claims = match auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return Err(AppError::Unauthorized("Invalid or expired token".to_string()));
        }
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Role-enforcement middleware for admin-only routes.
///
/// Must run after [`jwt_auth_middleware`] (it reads the claims it inserted).
pub async fn require_admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = request
        .extensions()
        .get::<JwtClaims>()
        .map(JwtClaims::is_admin)
        .unwrap_or(false);

    if !is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(
            extract_token_from_request(&headers).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; access_token=abc.def.ghi"),
        );
        assert_eq!(
            extract_token_from_request(&headers).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_extract_token_missing() {
        assert!(extract_token_from_request(&HeaderMap::new()).is_none());
    }
}
