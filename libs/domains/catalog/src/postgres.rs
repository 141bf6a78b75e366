use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::ExprTrait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    entity,
    error::{CatalogError, CatalogResult},
    models::{
        CreateFee, CreateOrganization, CreateService, CreateTechnician, Fee, Organization,
        Service, Technician,
    },
    repository::CatalogRepository,
};

pub struct PgCatalogRepository {
    organizations: BaseRepository<entity::organization::Entity>,
    services: BaseRepository<entity::service::Entity>,
    fees: BaseRepository<entity::fee::Entity>,
    technicians: BaseRepository<entity::technician::Entity>,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            organizations: BaseRepository::new(db.clone()),
            services: BaseRepository::new(db.clone()),
            fees: BaseRepository::new(db.clone()),
            technicians: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.organizations.db()
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    // ---- Organizations ----

    async fn create_organization(&self, input: CreateOrganization) -> CatalogResult<Organization> {
        let active_model: entity::organization::ActiveModel = input.into();
        let model = self
            .organizations
            .insert(active_model)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::info!(organization_id = %model.id, "Created organization");
        Ok(model.into())
    }

    async fn get_organization(&self, id: Uuid) -> CatalogResult<Option<Organization>> {
        let model = self
            .organizations
            .find_by_id(id)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    async fn list_organizations(&self) -> CatalogResult<Vec<Organization>> {
        let models = entity::organization::Entity::find()
            .order_by_asc(entity::organization::Column::Name)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_billable_organizations(&self) -> CatalogResult<Vec<Organization>> {
        let models = entity::organization::Entity::find()
            .filter(entity::organization::Column::Active.eq(true))
            .filter(entity::organization::Column::Suspended.eq(false))
            .order_by_asc(entity::organization::Column::Name)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_organization(&self, org: Organization) -> CatalogResult<Organization> {
        let id = org.id;
        let active_model: entity::organization::ActiveModel = org.into();
        let model = self
            .organizations
            .update(active_model)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::info!(organization_id = %id, "Updated organization");
        Ok(model.into())
    }

    async fn organization_name_exists(
        &self,
        name: &str,
        qbo_customer_name: &str,
    ) -> CatalogResult<bool> {
        let count = entity::organization::Entity::find()
            .filter(
                entity::organization::Column::Name
                    .eq(name)
                    .or(entity::organization::Column::QboCustomerName.eq(qbo_customer_name)),
            )
            .count(self.db())
            .await?;

        Ok(count > 0)
    }

    async fn count_billable_organizations(&self) -> CatalogResult<usize> {
        let count = entity::organization::Entity::find()
            .filter(entity::organization::Column::Active.eq(true))
            .filter(entity::organization::Column::Suspended.eq(false))
            .count(self.db())
            .await?;

        Ok(count as usize)
    }

    async fn count_suspended_organizations(&self) -> CatalogResult<usize> {
        let count = entity::organization::Entity::find()
            .filter(entity::organization::Column::Suspended.eq(true))
            .count(self.db())
            .await?;

        Ok(count as usize)
    }

    // ---- Services ----

    async fn create_service(&self, input: CreateService) -> CatalogResult<Service> {
        let active_model: entity::service::ActiveModel = input.into();
        let model = self
            .services
            .insert(active_model)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::info!(service_id = %model.id, "Created service");
        Ok(model.into())
    }

    async fn get_service(&self, id: Uuid) -> CatalogResult<Option<Service>> {
        let model = self
            .services
            .find_by_id(id)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    async fn list_services(&self) -> CatalogResult<Vec<Service>> {
        let models = entity::service::Entity::find()
            .order_by_asc(entity::service::Column::Name)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_active_services(&self) -> CatalogResult<Vec<Service>> {
        let models = entity::service::Entity::find()
            .filter(entity::service::Column::Active.eq(true))
            .order_by_asc(entity::service::Column::Name)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_service(&self, service: Service) -> CatalogResult<Service> {
        let id = service.id;
        let active_model: entity::service::ActiveModel = service.into();
        let model = self
            .services
            .update(active_model)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::info!(service_id = %id, "Updated service");
        Ok(model.into())
    }

    async fn service_name_exists(&self, name: &str) -> CatalogResult<bool> {
        let count = entity::service::Entity::find()
            .filter(entity::service::Column::Name.eq(name))
            .count(self.db())
            .await?;

        Ok(count > 0)
    }

    // ---- Fees ----

    async fn create_fee(&self, input: CreateFee) -> CatalogResult<Fee> {
        let active_model: entity::fee::ActiveModel = input.into();
        let model = self
            .fees
            .insert(active_model)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::info!(fee_id = %model.id, "Created fee");
        Ok(model.into())
    }

    async fn get_fee(&self, id: Uuid) -> CatalogResult<Option<Fee>> {
        let model = self
            .fees
            .find_by_id(id)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    async fn list_fees(&self) -> CatalogResult<Vec<Fee>> {
        let models = entity::fee::Entity::find()
            .order_by_asc(entity::fee::Column::Label)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_active_fees(&self) -> CatalogResult<Vec<Fee>> {
        let models = entity::fee::Entity::find()
            .filter(entity::fee::Column::Active.eq(true))
            .order_by_asc(entity::fee::Column::Label)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_fee(&self, fee: Fee) -> CatalogResult<Fee> {
        let id = fee.id;
        let active_model: entity::fee::ActiveModel = fee.into();
        let model = self
            .fees
            .update(active_model)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::info!(fee_id = %id, "Updated fee");
        Ok(model.into())
    }

    // ---- Technicians ----

    async fn create_technician(&self, input: CreateTechnician) -> CatalogResult<Technician> {
        let active_model: entity::technician::ActiveModel = input.into();
        let model = self
            .technicians
            .insert(active_model)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::info!(technician_id = %model.id, "Created technician");
        Ok(model.into())
    }

    async fn get_technician(&self, id: Uuid) -> CatalogResult<Option<Technician>> {
        let model = self
            .technicians
            .find_by_id(id)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    async fn list_technicians(&self) -> CatalogResult<Vec<Technician>> {
        let models = entity::technician::Entity::find()
            .order_by_asc(entity::technician::Column::Name)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_active_technicians(&self) -> CatalogResult<Vec<Technician>> {
        let models = entity::technician::Entity::find()
            .filter(entity::technician::Column::Active.eq(true))
            .order_by_asc(entity::technician::Column::Name)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_technician(&self, tech: Technician) -> CatalogResult<Technician> {
        let id = tech.id;
        let active_model: entity::technician::ActiveModel = tech.into();
        let model = self
            .technicians
            .update(active_model)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::info!(technician_id = %id, "Updated technician");
        Ok(model.into())
    }
}
