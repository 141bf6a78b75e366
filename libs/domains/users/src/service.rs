use std::sync::Arc;

use axum_helpers::JwtAuth;
use chrono::{Duration, Utc};
use notifications_email::{Email, EmailProvider};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{
    AdminResetPassword, CreateUser, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
    UpdateUser, User, UserProfile,
};
use crate::password::{generate_otp, hash_otp, hash_password, verify_password};
use crate::repository::UserRepository;

/// Reset codes stay valid this long
const OTP_TTL_MINUTES: i64 = 10;

/// Service layer for identity: login, password reset, staff management
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    mailer: Arc<dyn EmailProvider>,
    jwt: JwtAuth,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, mailer: Arc<dyn EmailProvider>, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            mailer,
            jwt,
        }
    }

    /// Verify credentials and mint a session token.
    ///
    /// Unknown email, wrong password, and deactivated accounts all surface as
    /// the same 401 so the login form cannot be used to probe accounts.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<(String, UserProfile)> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let user = self
            .repository
            .get_by_email(&input.email.to_lowercase())
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash) {
            return Err(UserError::InvalidCredentials);
        }
        if !user.active {
            return Err(UserError::Inactive);
        }

        let token = self
            .jwt
            .create_token(
                &user.id.to_string(),
                &user.email,
                &user.name,
                user.role.as_str(),
            )
            .map_err(|e| UserError::Internal(format!("Token creation failed: {}", e)))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok((token, user.into()))
    }

    /// Fresh profile for the authenticated user
    pub async fn profile(&self, user_id: Uuid) -> UserResult<UserProfile> {
        let user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound)?;
        Ok(user.into())
    }

    /// Start a password reset.
    ///
    /// Always succeeds from the caller's perspective; whether an email went
    /// out is never revealed. Inactive accounts get no code.
    #[instrument(skip(self, input))]
    pub async fn forgot_password(&self, input: ForgotPasswordRequest) -> UserResult<()> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let Some(mut user) = self
            .repository
            .get_by_email(&input.email.to_lowercase())
            .await?
        else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };
        if !user.active {
            tracing::debug!(user_id = %user.id, "Password reset requested for inactive account");
            return Ok(());
        }

        let otp = generate_otp();
        user.reset_otp_hash = Some(hash_otp(&otp));
        user.reset_otp_expires_at = Some(Utc::now() + Duration::minutes(OTP_TTL_MINUTES));
        user.updated_at = Utc::now();
        let user = self.repository.update(user).await?;

        let email = Email::plain_text(
            &user.email,
            "Your password reset code",
            format!(
                "Your password reset code is {}.\n\nIt expires in {} minutes. \
                 If you did not request a reset, you can ignore this email.",
                otp, OTP_TTL_MINUTES
            ),
        );
        self.mailer
            .send(&email)
            .await
            .map_err(|e| UserError::Email(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Sent password reset code");
        Ok(())
    }

    /// Complete a password reset with the emailed code
    #[instrument(skip(self, input))]
    pub async fn reset_password(&self, input: ResetPasswordRequest) -> UserResult<()> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_email(&input.email.to_lowercase())
            .await?
            .ok_or_else(|| UserError::Validation("Invalid or expired code".to_string()))?;

        let valid = match (&user.reset_otp_hash, user.reset_otp_expires_at) {
            (Some(stored), Some(expires_at)) => {
                *stored == hash_otp(&input.otp) && expires_at > Utc::now()
            }
            _ => false,
        };
        if !valid {
            return Err(UserError::Validation("Invalid or expired code".to_string()));
        }

        user.password_hash = hash_password(&input.new_password)?;
        user.reset_otp_hash = None;
        user.reset_otp_expires_at = None;
        user.updated_at = Utc::now();
        self.repository.update(user).await?;

        Ok(())
    }

    // ---- Admin staff management ----

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserProfile> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let email = input.email.to_lowercase();
        if self.repository.email_exists(&email).await? {
            return Err(UserError::Conflict("Email already in use".to_string()));
        }

        let now = Utc::now();
        let user = self
            .repository
            .create(User {
                id: Uuid::now_v7(),
                name: input.name.trim().to_string(),
                email,
                password_hash: hash_password(&input.password)?,
                role: input.role,
                active: true,
                reset_otp_hash: None,
                reset_otp_expires_at: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        Ok(user.into())
    }

    pub async fn list_users(&self) -> UserResult<Vec<UserProfile>> {
        let users = self.repository.list_all().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserProfile> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        if let Some(email) = input.email {
            let email = email.to_lowercase();
            if email != user.email && self.repository.email_exists(&email).await? {
                return Err(UserError::Conflict("Email already in use".to_string()));
            }
            user.email = email;
        }
        if let Some(name) = input.name {
            user.name = name.trim().to_string();
        }
        user.updated_at = Utc::now();

        let user = self.repository.update(user).await?;
        Ok(user.into())
    }

    /// Flip an account's active flag; admins cannot lock themselves out
    pub async fn toggle_user_active(&self, id: Uuid, actor_id: Uuid) -> UserResult<UserProfile> {
        if id == actor_id {
            return Err(UserError::Forbidden(
                "Cannot deactivate yourself".to_string(),
            ));
        }

        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        user.active = !user.active;
        user.updated_at = Utc::now();

        let user = self.repository.update(user).await?;
        Ok(user.into())
    }

    /// Admin-set password; clears any outstanding reset code
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn admin_reset_password(
        &self,
        id: Uuid,
        input: AdminResetPassword,
    ) -> UserResult<()> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        user.password_hash = hash_password(&input.password)?;
        user.reset_otp_hash = None;
        user.reset_otp_expires_at = None;
        user.updated_at = Utc::now();
        self.repository.update(user).await?;

        Ok(())
    }

    /// Exporter-email lookup used by the export history view
    pub async fn emails_by_ids(
        &self,
        ids: Vec<Uuid>,
    ) -> UserResult<std::collections::HashMap<Uuid, String>> {
        self.repository.emails_by_ids(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::repository::MockUserRepository;
    use axum_helpers::JwtConfig;
    use notifications_email::MockSmtpProvider;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("unit-test-secret-at-least-32-chars!!"))
    }

    fn user_with_password(password: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::now_v7(),
            name: "Jo Smith".to_string(),
            email: "jo@example.com".to_string(),
            password_hash: hash_password(password).unwrap(),
            role: UserRole::Staff,
            active: true,
            reset_otp_hash: None,
            reset_otp_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let user = user_with_password("hunter22");
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .withf(|email| email == "jo@example.com")
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(repo, Arc::new(MockSmtpProvider::new()), jwt());
        let (token, profile) = service
            .login(LoginRequest {
                email: "Jo@Example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();

        assert!(!token.is_empty());
        assert_eq!(profile.id, user_id);

        let claims = jwt().verify_token(&token).unwrap();
        assert_eq!(claims.email, "jo@example.com");
        assert_eq!(claims.role, "staff");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = user_with_password("hunter22");

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(repo, Arc::new(MockSmtpProvider::new()), jwt());
        let err = service
            .login(LoginRequest {
                email: "jo@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_inactive_account() {
        let mut user = user_with_password("hunter22");
        user.active = false;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(repo, Arc::new(MockSmtpProvider::new()), jwt());
        let err = service
            .login(LoginRequest {
                email: "jo@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Inactive));
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email_is_silent() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email().returning(|_| Ok(None));

        let mailer = Arc::new(MockSmtpProvider::new());
        let service = UserService::new(repo, mailer.clone(), jwt());

        service
            .forgot_password(ForgotPasswordRequest {
                email: "nobody@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(mailer.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_forgot_password_stores_hash_and_emails_code() {
        let user = user_with_password("hunter22");

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update()
            .withf(|u| u.reset_otp_hash.is_some() && u.reset_otp_expires_at.is_some())
            .returning(Ok);

        let mailer = Arc::new(MockSmtpProvider::new());
        let service = UserService::new(repo, mailer.clone(), jwt());

        service
            .forgot_password(ForgotPasswordRequest {
                email: "jo@example.com".to_string(),
            })
            .await
            .unwrap();

        let sent = mailer.sent_emails().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jo@example.com");
        // The plain code goes to email only, never to storage
        let body = sent[0].body_text.clone().unwrap();
        assert!(body.chars().filter(|c| c.is_ascii_digit()).count() >= 6);
    }

    #[tokio::test]
    async fn test_reset_password_accepts_valid_code() {
        let mut user = user_with_password("hunter22");
        user.reset_otp_hash = Some(hash_otp("123456"));
        user.reset_otp_expires_at = Some(Utc::now() + Duration::minutes(5));

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update()
            .withf(|u| u.reset_otp_hash.is_none() && u.reset_otp_expires_at.is_none())
            .returning(Ok);

        let service = UserService::new(repo, Arc::new(MockSmtpProvider::new()), jwt());
        service
            .reset_password(ResetPasswordRequest {
                email: "jo@example.com".to_string(),
                otp: "123456".to_string(),
                new_password: "newsecret".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_password_rejects_expired_code() {
        let mut user = user_with_password("hunter22");
        user.reset_otp_hash = Some(hash_otp("123456"));
        user.reset_otp_expires_at = Some(Utc::now() - Duration::minutes(1));

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(repo, Arc::new(MockSmtpProvider::new()), jwt());
        let err = service
            .reset_password(ResetPasswordRequest {
                email: "jo@example.com".to_string(),
                otp: "123456".to_string(),
                new_password: "newsecret".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reset_password_rejects_wrong_code() {
        let mut user = user_with_password("hunter22");
        user.reset_otp_hash = Some(hash_otp("123456"));
        user.reset_otp_expires_at = Some(Utc::now() + Duration::minutes(5));

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(repo, Arc::new(MockSmtpProvider::new()), jwt());
        let err = service
            .reset_password(ResetPasswordRequest {
                email: "jo@example.com".to_string(),
                otp: "654321".to_string(),
                new_password: "newsecret".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(true));

        let service = UserService::new(repo, Arc::new(MockSmtpProvider::new()), jwt());
        let err = service
            .create_user(CreateUser {
                name: "Jo".to_string(),
                email: "jo@example.com".to_string(),
                password: "secret1".to_string(),
                role: UserRole::Staff,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_user_lowercases_email_and_hashes() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|u| u.email == "jo@example.com" && u.password_hash.starts_with("$argon2"))
            .returning(Ok);

        let service = UserService::new(repo, Arc::new(MockSmtpProvider::new()), jwt());
        let profile = service
            .create_user(CreateUser {
                name: "Jo".to_string(),
                email: "Jo@Example.COM".to_string(),
                password: "secret1".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();

        assert_eq!(profile.email, "jo@example.com");
    }

    #[tokio::test]
    async fn test_toggle_active_rejects_self() {
        let repo = MockUserRepository::new();
        let service = UserService::new(repo, Arc::new(MockSmtpProvider::new()), jwt());

        let id = Uuid::now_v7();
        let err = service.toggle_user_active(id, id).await.unwrap_err();
        assert!(matches!(err, UserError::Forbidden(_)));
    }
}
