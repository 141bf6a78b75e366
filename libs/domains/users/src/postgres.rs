use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    entity,
    error::{UserError, UserResult},
    models::User,
    repository::UserRepository,
};

#[derive(Clone)]
pub struct PgUserRepository {
    users: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.users.db()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let active_model: entity::ActiveModel = user.into();
        let model = self
            .users
            .insert(active_model)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        tracing::info!(user_id = %model.id, "Created user account");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = self
            .users
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(self.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .count(self.db())
            .await?;

        Ok(count > 0)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let id = user.id;
        let active_model: entity::ActiveModel = user.into();
        let model = self
            .users
            .update(active_model)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        tracing::info!(user_id = %id, "Updated user account");
        Ok(model.into())
    }

    async fn list_all(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Name)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn emails_by_ids(&self, ids: Vec<Uuid>) -> UserResult<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, String)> = entity::Entity::find()
            .select_only()
            .column(entity::Column::Id)
            .column(entity::Column::Email)
            .filter(entity::Column::Id.is_in(ids))
            .into_tuple()
            .all(self.db())
            .await?;

        Ok(rows.into_iter().collect())
    }
}
