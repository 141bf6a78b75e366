use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateFee, CreateOrganization, CreateService, CreateTechnician, Fee, Organization, Service,
    Technician, UpdateFee, UpdateOrganization, UpdateService, UpdateTechnician,
};
use crate::repository::CatalogRepository;

/// Service layer for catalog business logic
#[derive(Clone)]
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    // ---- Organizations ----

    #[instrument(skip(self, input), fields(org_name = %input.name))]
    pub async fn create_organization(&self, input: CreateOrganization) -> CatalogResult<Organization> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let exists = self
            .repository
            .organization_name_exists(input.name.trim(), input.qbo_customer_name.trim())
            .await?;
        if exists {
            return Err(CatalogError::Conflict(
                "Organization name or QBO customer name already exists".to_string(),
            ));
        }

        self.repository.create_organization(input).await
    }

    pub async fn list_organizations(&self) -> CatalogResult<Vec<Organization>> {
        self.repository.list_organizations().await
    }

    pub async fn list_billable_organizations(&self) -> CatalogResult<Vec<Organization>> {
        self.repository.list_billable_organizations().await
    }

    #[instrument(skip(self, input), fields(organization_id = %id))]
    pub async fn update_organization(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> CatalogResult<Organization> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut org = self
            .repository
            .get_organization(id)
            .await?
            .ok_or(CatalogError::NotFound("Organization", id))?;

        org.apply_update(input);
        self.repository.update_organization(org).await
    }

    /// Flip the active flag (soft delete / restore)
    pub async fn toggle_organization_active(&self, id: Uuid) -> CatalogResult<Organization> {
        let mut org = self
            .repository
            .get_organization(id)
            .await?
            .ok_or(CatalogError::NotFound("Organization", id))?;

        org.active = !org.active;
        self.repository.update_organization(org).await
    }

    /// Flip the suspended flag (billing block)
    pub async fn toggle_organization_suspended(&self, id: Uuid) -> CatalogResult<Organization> {
        let mut org = self
            .repository
            .get_organization(id)
            .await?
            .ok_or(CatalogError::NotFound("Organization", id))?;

        org.suspended = !org.suspended;
        self.repository.update_organization(org).await
    }

    /// Organization eligible for new service records, if any
    pub async fn get_billable_organization(&self, id: Uuid) -> CatalogResult<Option<Organization>> {
        Ok(self
            .repository
            .get_organization(id)
            .await?
            .filter(Organization::is_billable))
    }

    pub async fn get_organization(&self, id: Uuid) -> CatalogResult<Organization> {
        self.repository
            .get_organization(id)
            .await?
            .ok_or(CatalogError::NotFound("Organization", id))
    }

    pub async fn count_billable_organizations(&self) -> CatalogResult<usize> {
        self.repository.count_billable_organizations().await
    }

    pub async fn count_suspended_organizations(&self) -> CatalogResult<usize> {
        self.repository.count_suspended_organizations().await
    }

    // ---- Services ----

    #[instrument(skip(self, input), fields(service_name = %input.name))]
    pub async fn create_service(&self, input: CreateService) -> CatalogResult<Service> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        if self.repository.service_name_exists(input.name.trim()).await? {
            return Err(CatalogError::Conflict(
                "Service name already exists".to_string(),
            ));
        }

        self.repository.create_service(input).await
    }

    pub async fn list_services(&self) -> CatalogResult<Vec<Service>> {
        self.repository.list_services().await
    }

    pub async fn list_active_services(&self) -> CatalogResult<Vec<Service>> {
        self.repository.list_active_services().await
    }

    #[instrument(skip(self, input), fields(service_id = %id))]
    pub async fn update_service(&self, id: Uuid, input: UpdateService) -> CatalogResult<Service> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut service = self
            .repository
            .get_service(id)
            .await?
            .ok_or(CatalogError::NotFound("Service", id))?;

        service.apply_update(input);
        self.repository.update_service(service).await
    }

    pub async fn toggle_service_active(&self, id: Uuid) -> CatalogResult<Service> {
        let mut service = self
            .repository
            .get_service(id)
            .await?
            .ok_or(CatalogError::NotFound("Service", id))?;

        service.active = !service.active;
        self.repository.update_service(service).await
    }

    pub async fn get_active_service(&self, id: Uuid) -> CatalogResult<Option<Service>> {
        Ok(self.repository.get_service(id).await?.filter(|s| s.active))
    }

    // ---- Fees ----

    #[instrument(skip(self, input), fields(fee_label = %input.label))]
    pub async fn create_fee(&self, input: CreateFee) -> CatalogResult<Fee> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.create_fee(input).await
    }

    pub async fn list_fees(&self) -> CatalogResult<Vec<Fee>> {
        self.repository.list_fees().await
    }

    pub async fn list_active_fees(&self) -> CatalogResult<Vec<Fee>> {
        self.repository.list_active_fees().await
    }

    #[instrument(skip(self, input), fields(fee_id = %id))]
    pub async fn update_fee(&self, id: Uuid, input: UpdateFee) -> CatalogResult<Fee> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut fee = self
            .repository
            .get_fee(id)
            .await?
            .ok_or(CatalogError::NotFound("Fee", id))?;

        fee.apply_update(input);
        self.repository.update_fee(fee).await
    }

    pub async fn toggle_fee_active(&self, id: Uuid) -> CatalogResult<Fee> {
        let mut fee = self
            .repository
            .get_fee(id)
            .await?
            .ok_or(CatalogError::NotFound("Fee", id))?;

        fee.active = !fee.active;
        self.repository.update_fee(fee).await
    }

    pub async fn get_active_fee(&self, id: Uuid) -> CatalogResult<Option<Fee>> {
        Ok(self.repository.get_fee(id).await?.filter(|f| f.active))
    }

    // ---- Technicians ----

    #[instrument(skip(self, input), fields(technician_name = %input.name))]
    pub async fn create_technician(&self, input: CreateTechnician) -> CatalogResult<Technician> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.create_technician(input).await
    }

    pub async fn list_technicians(&self) -> CatalogResult<Vec<Technician>> {
        self.repository.list_technicians().await
    }

    pub async fn list_active_technicians(&self) -> CatalogResult<Vec<Technician>> {
        self.repository.list_active_technicians().await
    }

    #[instrument(skip(self, input), fields(technician_id = %id))]
    pub async fn update_technician(
        &self,
        id: Uuid,
        input: UpdateTechnician,
    ) -> CatalogResult<Technician> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let mut tech = self
            .repository
            .get_technician(id)
            .await?
            .ok_or(CatalogError::NotFound("Technician", id))?;

        tech.apply_update(input);
        self.repository.update_technician(tech).await
    }

    pub async fn toggle_technician_active(&self, id: Uuid) -> CatalogResult<Technician> {
        let mut tech = self
            .repository
            .get_technician(id)
            .await?
            .ok_or(CatalogError::NotFound("Technician", id))?;

        tech.active = !tech.active;
        self.repository.update_technician(tech).await
    }

    pub async fn get_active_technician(&self, id: Uuid) -> CatalogResult<Option<Technician>> {
        Ok(self.repository.get_technician(id).await?.filter(|t| t.active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCatalogRepository;
    use chrono::Utc;

    fn org_with(active: bool, suspended: bool) -> Organization {
        Organization {
            id: Uuid::now_v7(),
            name: "Sunrise Clinic".to_string(),
            qbo_customer_name: "Sunrise Clinic LLC".to_string(),
            invoice_memo: None,
            active,
            suspended,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_organization_rejects_duplicate() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_organization_name_exists()
            .returning(|_, _| Ok(true));

        let service = CatalogService::new(repo);
        let err = service
            .create_organization(CreateOrganization {
                name: "Sunrise Clinic".to_string(),
                qbo_customer_name: "Sunrise Clinic LLC".to_string(),
                invoice_memo: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_organization_rejects_empty_name() {
        let repo = MockCatalogRepository::new();
        let service = CatalogService::new(repo);

        let err = service
            .create_organization(CreateOrganization {
                name: "".to_string(),
                qbo_customer_name: "Sunrise Clinic LLC".to_string(),
                invoice_memo: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_toggle_organization_suspended_flips_flag() {
        let org = org_with(true, false);
        let org_id = org.id;

        let mut repo = MockCatalogRepository::new();
        repo.expect_get_organization()
            .returning(move |_| Ok(Some(org.clone())));
        repo.expect_update_organization()
            .withf(|o| o.suspended)
            .returning(|o| Ok(o));

        let service = CatalogService::new(repo);
        let updated = service.toggle_organization_suspended(org_id).await.unwrap();
        assert!(updated.suspended);
    }

    #[tokio::test]
    async fn test_get_billable_organization_filters_suspended() {
        let org = org_with(true, true);

        let mut repo = MockCatalogRepository::new();
        repo.expect_get_organization()
            .returning(move |_| Ok(Some(org.clone())));

        let service = CatalogService::new(repo);
        let found = service
            .get_billable_organization(Uuid::now_v7())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_organization_not_found() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_organization().returning(|_| Ok(None));

        let service = CatalogService::new(repo);
        let err = service
            .update_organization(Uuid::now_v7(), UpdateOrganization::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(_, _)));
    }
}
