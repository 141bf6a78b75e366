use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::BaseRepository;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{RecordError, RecordResult},
    models::ServiceRecord,
    repository::ServiceRecordRepository,
};

pub struct PgServiceRecordRepository {
    records: BaseRepository<entity::Entity>,
}

impl PgServiceRecordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            records: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.records.db()
    }
}

#[async_trait]
impl ServiceRecordRepository for PgServiceRecordRepository {
    async fn create(&self, record: ServiceRecord) -> RecordResult<ServiceRecord> {
        let active_model: entity::ActiveModel = record.into();
        let model = self
            .records
            .insert(active_model)
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        tracing::info!(record_id = %model.id, "Created service record");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> RecordResult<Option<ServiceRecord>> {
        let model = self
            .records
            .find_by_id(id)
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    async fn update(&self, record: ServiceRecord) -> RecordResult<ServiceRecord> {
        let id = record.id;
        let active_model: entity::ActiveModel = record.into();
        let model = self
            .records
            .update(active_model)
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        tracing::info!(record_id = %id, "Updated service record");
        Ok(model.into())
    }

    async fn list_by_user(&self, user_id: Uuid, limit: u64) -> RecordResult<Vec<ServiceRecord>> {
        let models = entity::Entity::find()
            .filter(entity::Column::EnteredBy.eq(user_id))
            .order_by_desc(entity::Column::CreatedAt)
            .limit(limit)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> RecordResult<Vec<ServiceRecord>> {
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_unbilled(&self) -> RecordResult<usize> {
        let count = entity::Entity::find()
            .filter(entity::Column::Billed.eq(false))
            .count(self.db())
            .await?;

        Ok(count as usize)
    }

    async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordResult<usize> {
        let count = entity::Entity::find()
            .filter(entity::Column::CreatedAt.gte(start))
            .filter(entity::Column::CreatedAt.lt(end))
            .count(self.db())
            .await?;

        Ok(count as usize)
    }

    async fn count_unbilled_before(&self, cutoff: DateTime<Utc>) -> RecordResult<usize> {
        let count = entity::Entity::find()
            .filter(entity::Column::Billed.eq(false))
            .filter(entity::Column::ServiceDate.lt(cutoff))
            .count(self.db())
            .await?;

        Ok(count as usize)
    }

    async fn count_by_user_created_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> RecordResult<usize> {
        let count = entity::Entity::find()
            .filter(entity::Column::EnteredBy.eq(user_id))
            .filter(entity::Column::CreatedAt.gte(since))
            .count(self.db())
            .await?;

        Ok(count as usize)
    }

    async fn count_by_user_unbilled(&self, user_id: Uuid) -> RecordResult<usize> {
        let count = entity::Entity::find()
            .filter(entity::Column::EnteredBy.eq(user_id))
            .filter(entity::Column::Billed.eq(false))
            .count(self.db())
            .await?;

        Ok(count as usize)
    }

    async fn last_entry_at(&self, user_id: Uuid) -> RecordResult<Option<DateTime<Utc>>> {
        let model = entity::Entity::find()
            .filter(entity::Column::EnteredBy.eq(user_id))
            .order_by_desc(entity::Column::CreatedAt)
            .one(self.db())
            .await?;

        Ok(model.map(|m| m.created_at.into()))
    }
}
