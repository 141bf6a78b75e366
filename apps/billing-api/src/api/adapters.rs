//! Cross-domain seam implementations.
//!
//! The records and exports domains only know their own trait seams; this
//! module plugs the catalog and users services into them.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use domain_exports::{ExportError, ExportResult, ExporterDirectory, OrganizationDirectory};
use domain_records::reference::{
    FeeRef, OrganizationRef, ReferenceData, ServiceRef, TechnicianRef,
};
use domain_records::{RecordError, RecordResult};

use crate::state::{CatalogSvc, UserSvc};

/// Record entry-time catalog lookups, backed by the catalog service
pub struct CatalogReferenceData {
    catalog: Arc<CatalogSvc>,
}

impl CatalogReferenceData {
    pub fn new(catalog: Arc<CatalogSvc>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ReferenceData for CatalogReferenceData {
    async fn billable_organization(&self, id: Uuid) -> RecordResult<Option<OrganizationRef>> {
        let org = self
            .catalog
            .get_billable_organization(id)
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        Ok(org.map(|o| OrganizationRef {
            id: o.id,
            name: o.name,
            qbo_customer_name: o.qbo_customer_name,
        }))
    }

    async fn active_service(&self, id: Uuid) -> RecordResult<Option<ServiceRef>> {
        let service = self
            .catalog
            .get_active_service(id)
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        Ok(service.map(|s| ServiceRef {
            id: s.id,
            name: s.name,
            qbo_item_name: s.qbo_item_name,
            rate_cents: s.rate_cents,
        }))
    }

    async fn active_fee(&self, id: Uuid) -> RecordResult<Option<FeeRef>> {
        let fee = self
            .catalog
            .get_active_fee(id)
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        Ok(fee.map(|f| FeeRef {
            id: f.id,
            label: f.label,
            amount_cents: f.amount_cents,
        }))
    }

    async fn active_technician(&self, id: Uuid) -> RecordResult<Option<TechnicianRef>> {
        let technician = self
            .catalog
            .get_active_technician(id)
            .await
            .map_err(|e| RecordError::Database(e.to_string()))?;

        Ok(technician.map(|t| TechnicianRef {
            id: t.id,
            name: t.name,
        }))
    }
}

/// Invoice-memo lookups for the export engine
pub struct CatalogOrganizationDirectory {
    catalog: Arc<CatalogSvc>,
}

impl CatalogOrganizationDirectory {
    pub fn new(catalog: Arc<CatalogSvc>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl OrganizationDirectory for CatalogOrganizationDirectory {
    async fn invoice_memos(
        &self,
        ids: Vec<Uuid>,
    ) -> ExportResult<HashMap<Uuid, Option<String>>> {
        let wanted: HashSet<Uuid> = ids.into_iter().collect();
        let organizations = self
            .catalog
            .list_organizations()
            .await
            .map_err(|e| ExportError::Database(e.to_string()))?;

        Ok(organizations
            .into_iter()
            .filter(|o| wanted.contains(&o.id))
            .map(|o| (o.id, o.invoice_memo))
            .collect())
    }
}

/// Exporter-email resolution for the export history view
pub struct UserExporterDirectory {
    users: UserSvc,
}

impl UserExporterDirectory {
    pub fn new(users: UserSvc) -> Self {
        Self { users }
    }
}

#[async_trait]
impl ExporterDirectory for UserExporterDirectory {
    async fn emails(&self, ids: Vec<Uuid>) -> ExportResult<HashMap<Uuid, String>> {
        self.users
            .emails_by_ids(ids)
            .await
            .map_err(|e| ExportError::Database(e.to_string()))
    }
}
