use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{
    CreateFee, CreateOrganization, CreateService, CreateTechnician, Fee, Organization, Service,
    Technician,
};

/// Repository trait for catalog persistence
///
/// One trait covers all four reference-data tables; they share the same
/// lifecycle (create, list, patch, toggle flags, never delete).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // ---- Organizations ----
    async fn create_organization(&self, input: CreateOrganization) -> CatalogResult<Organization>;
    async fn get_organization(&self, id: Uuid) -> CatalogResult<Option<Organization>>;
    async fn list_organizations(&self) -> CatalogResult<Vec<Organization>>;
    /// Active, non-suspended organizations for staff entry forms
    async fn list_billable_organizations(&self) -> CatalogResult<Vec<Organization>>;
    async fn update_organization(&self, org: Organization) -> CatalogResult<Organization>;
    async fn organization_name_exists(&self, name: &str, qbo_customer_name: &str)
        -> CatalogResult<bool>;
    async fn count_billable_organizations(&self) -> CatalogResult<usize>;
    async fn count_suspended_organizations(&self) -> CatalogResult<usize>;

    // ---- Services ----
    async fn create_service(&self, input: CreateService) -> CatalogResult<Service>;
    async fn get_service(&self, id: Uuid) -> CatalogResult<Option<Service>>;
    async fn list_services(&self) -> CatalogResult<Vec<Service>>;
    async fn list_active_services(&self) -> CatalogResult<Vec<Service>>;
    async fn update_service(&self, service: Service) -> CatalogResult<Service>;
    async fn service_name_exists(&self, name: &str) -> CatalogResult<bool>;

    // ---- Fees ----
    async fn create_fee(&self, input: CreateFee) -> CatalogResult<Fee>;
    async fn get_fee(&self, id: Uuid) -> CatalogResult<Option<Fee>>;
    async fn list_fees(&self) -> CatalogResult<Vec<Fee>>;
    async fn list_active_fees(&self) -> CatalogResult<Vec<Fee>>;
    async fn update_fee(&self, fee: Fee) -> CatalogResult<Fee>;

    // ---- Technicians ----
    async fn create_technician(&self, input: CreateTechnician) -> CatalogResult<Technician>;
    async fn get_technician(&self, id: Uuid) -> CatalogResult<Option<Technician>>;
    async fn list_technicians(&self) -> CatalogResult<Vec<Technician>>;
    async fn list_active_technicians(&self) -> CatalogResult<Vec<Technician>>;
    async fn update_technician(&self, tech: Technician) -> CatalogResult<Technician>;
}
