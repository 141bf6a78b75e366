use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::User;

/// Repository trait for account persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Lookup by (lowercased) email
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> UserResult<bool>;

    /// Replace an account row
    async fn update(&self, user: User) -> UserResult<User>;

    /// All accounts, name-sorted
    async fn list_all(&self) -> UserResult<Vec<User>>;

    /// Emails for the given ids (export history exporter resolution)
    async fn emails_by_ids(&self, ids: Vec<Uuid>) -> UserResult<HashMap<Uuid, String>>;
}
