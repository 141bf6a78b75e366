//! Export/Billing Engine
//!
//! The core of the billing service: one export run selects unbilled service
//! records for a date range, persists an [`models::ExportBatch`], allocates
//! one invoice number per organization, renders CSV/XLSX line items, commits
//! the must-not-double-bill transition (re-asserting `billed = false` so the
//! first committer wins), and uploads the artifact to object storage.
//!
//! The engine is generic over four seams (batch repository, record store,
//! organization directory, artifact store) with Postgres/S3 implementations
//! alongside.

pub mod directory;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod invoice;
pub mod models;
pub mod postgres;
pub mod records;
pub mod render;
pub mod repository;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use directory::{ExporterDirectory, OrganizationDirectory};
pub use error::{ExportError, ExportResult};
pub use handlers::{router, ExportApiState, ExportsApiDoc};
pub use models::{
    BillableRecord, DateRange, DownloadUrl, ExportBatch, ExportFile, ExportFormat,
    ExportHistoryEntry, ExportRequest, ExportStatus,
};
pub use postgres::{PgBillableRecords, PgExportBatchRepository};
pub use records::BillableRecords;
pub use repository::ExportBatchRepository;
pub use service::ExportService;
pub use storage::{ArtifactStore, S3ArtifactStore, SIGNED_URL_TTL};
