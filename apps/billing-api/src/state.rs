//! Shared application state handed to the routers.

use std::sync::Arc;

use axum_helpers::JwtAuth;
use sea_orm::DatabaseConnection;

use domain_catalog::{CatalogService, PgCatalogRepository};
use domain_exports::{
    ExportApiState, ExportService, PgBillableRecords, PgExportBatchRepository, S3ArtifactStore,
};
use domain_records::{PgServiceRecordRepository, RecordService};
use domain_users::{PgUserRepository, UserService, UsersApiState};

use crate::api::adapters::{CatalogOrganizationDirectory, CatalogReferenceData};
use crate::config::Config;

pub type CatalogSvc = CatalogService<PgCatalogRepository>;
pub type RecordSvc = RecordService<PgServiceRecordRepository, CatalogReferenceData>;
pub type UserSvc = UserService<PgUserRepository>;
pub type ExportSvc = ExportService<
    PgExportBatchRepository,
    PgBillableRecords,
    CatalogOrganizationDirectory,
    S3ArtifactStore,
>;

/// Cloned per handler; everything inside is an Arc
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DatabaseConnection,
    pub jwt: JwtAuth,
    pub catalog: Arc<CatalogSvc>,
    pub records: Arc<RecordSvc>,
    pub exports: Arc<ExportApiState<
        PgExportBatchRepository,
        PgBillableRecords,
        CatalogOrganizationDirectory,
        S3ArtifactStore,
    >>,
    pub users: Arc<UsersApiState<PgUserRepository>>,
}
