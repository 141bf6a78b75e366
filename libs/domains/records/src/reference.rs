//! Seam to the reference-data catalog.
//!
//! Record entry only needs eligibility checks plus the display values to
//! snapshot, so this trait deals in slim ref structs rather than full catalog
//! models. The api crate adapts `domain_catalog` onto it; tests mock it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RecordResult;

/// Snapshot source for an active, non-suspended organization
#[derive(Debug, Clone)]
pub struct OrganizationRef {
    pub id: Uuid,
    pub name: String,
    pub qbo_customer_name: String,
}

/// Snapshot source for an active service
#[derive(Debug, Clone)]
pub struct ServiceRef {
    pub id: Uuid,
    pub name: String,
    pub qbo_item_name: String,
    pub rate_cents: i64,
}

/// Snapshot source for an active fee
#[derive(Debug, Clone)]
pub struct FeeRef {
    pub id: Uuid,
    pub label: String,
    pub amount_cents: i64,
}

/// Snapshot source for an active technician
#[derive(Debug, Clone)]
pub struct TechnicianRef {
    pub id: Uuid,
    pub name: String,
}

/// Catalog lookups performed at record entry/edit time.
///
/// Each method returns `None` when the row is missing OR ineligible
/// (inactive, or suspended for organizations).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceData: Send + Sync {
    async fn billable_organization(&self, id: Uuid) -> RecordResult<Option<OrganizationRef>>;
    async fn active_service(&self, id: Uuid) -> RecordResult<Option<ServiceRef>>;
    async fn active_fee(&self, id: Uuid) -> RecordResult<Option<FeeRef>>;
    async fn active_technician(&self, id: Uuid) -> RecordResult<Option<TechnicianRef>>;
}
