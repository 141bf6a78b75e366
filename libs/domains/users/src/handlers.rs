use axum::{
    extract::State,
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use axum_helpers::{
    jwt_auth_middleware, AppError, JwtAuth, JwtClaims, UuidPath, ValidatedJson, TOKEN_COOKIE,
    TOKEN_TTL_SECS,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    AdminResetPassword, CreateUser, ForgotPasswordRequest, LoginRequest, LoginResponse,
    MessageResponse, ResetPasswordRequest, UpdateUser, UserProfile, UserRole,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for auth and staff management
#[derive(OpenApi)]
#[openapi(
    paths(
        login,
        logout,
        me,
        forgot_password,
        reset_password,
        list_users,
        create_user,
        update_user,
        toggle_user_active,
        admin_reset_password,
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        UserProfile,
        UserRole,
        CreateUser,
        UpdateUser,
        AdminResetPassword,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        MessageResponse,
    )),
    tags(
        (name = "auth", description = "Login, session, and password reset"),
        (name = "users", description = "Admin staff management")
    )
)]
pub struct UsersApiDoc;

/// Handler state: the identity service plus whether session cookies should
/// carry the Secure attribute (HTTPS deployments).
pub struct UsersApiState<R: UserRepository> {
    pub service: UserService<R>,
    pub secure_cookies: bool,
}

/// Auth routes.
///
/// `/logout` and `/me` require a session; login and the password-reset pair
/// are reachable without one, so this router carries its own JWT layer
/// instead of relying on the app-wide protected group.
pub fn auth_router<R: UserRepository + 'static>(
    state: Arc<UsersApiState<R>>,
    jwt: JwtAuth,
) -> Router {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .with_state(state)
}

/// Staff management routes (mount behind the admin middleware)
pub fn admin_router<R: UserRepository + 'static>(state: Arc<UsersApiState<R>>) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", patch(update_user))
        .route("/{id}/toggle-active", patch(toggle_user_active))
        .route("/{id}/reset-password", post(admin_reset_password))
        .with_state(state)
}

fn session_cookie(token: &str, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax{}",
        TOKEN_COOKIE,
        token,
        TOKEN_TTL_SECS,
        if secure { "; Secure" } else { "" }
    )
}

fn clear_session_cookie(secure: bool) -> String {
    format!(
        "{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax{}",
        TOKEN_COOKIE,
        if secure { "; Secure" } else { "" }
    )
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (token, user) = state.service.login(input).await?;

    let headers = [(
        header::SET_COOKIE,
        session_cookie(&token, state.secure_cookies),
    )];
    Ok((headers, Json(LoginResponse { token, user })))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    responses((status = 200, description = "Session cleared", body = MessageResponse))
)]
pub async fn logout<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
) -> impl IntoResponse {
    let headers = [(
        header::SET_COOKIE,
        clear_session_cookie(state.secure_cookies),
    )];
    (headers, Json(MessageResponse::new("Logged out successfully")))
}

/// The authenticated user's profile
#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<UserProfile>, AppError> {
    let user_id = claims.user_id()?;
    Ok(Json(state.service.profile(user_id).await?))
}

/// Request a password reset code by email.
///
/// Responds 200 regardless of whether the account exists.
#[utoipa::path(
    post,
    path = "/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses((status = 200, description = "Reset code sent if the account exists", body = MessageResponse))
)]
pub async fn forgot_password<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
    ValidatedJson(input): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.forgot_password(input).await?;
    Ok(Json(MessageResponse::new(
        "If that account exists, a reset code has been emailed",
    )))
}

/// Set a new password using the emailed code
#[utoipa::path(
    post,
    path = "/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid or expired code")
    )
)]
pub async fn reset_password<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.reset_password(input).await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

// ---- Admin staff management ----

/// List all accounts
#[utoipa::path(
    get,
    path = "",
    tag = "users",
    responses((status = 200, description = "All accounts", body = Vec<UserProfile>))
)]
pub async fn list_users<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(state.service.list_users().await?))
}

/// Create a staff or admin account
#[utoipa::path(
    post,
    path = "",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_user<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update an account's name or email
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Account updated", body = UserProfile),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_user<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.service.update_user(id, input).await?))
}

/// Activate / deactivate an account (not your own)
#[utoipa::path(
    patch,
    path = "/{id}/toggle-active",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account toggled", body = UserProfile),
        (status = 403, description = "Cannot deactivate yourself"),
        (status = 404, description = "User not found")
    )
)]
pub async fn toggle_user_active<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> Result<Json<UserProfile>, AppError> {
    let actor_id = claims.user_id()?;
    Ok(Json(state.service.toggle_user_active(id, actor_id).await?))
}

/// Admin-set a user's password
#[utoipa::path(
    post,
    path = "/{id}/reset-password",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = AdminResetPassword,
    responses(
        (status = 200, description = "Password set", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn admin_reset_password<R: UserRepository>(
    State(state): State<Arc<UsersApiState<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AdminResetPassword>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.admin_reset_password(id, input).await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc.def.ghi", false);
        assert!(cookie.starts_with("access_token=abc.def.ghi;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));

        let secure = session_cookie("abc.def.ghi", true);
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false);
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("access_token=;"));
    }
}
