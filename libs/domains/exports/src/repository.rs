use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ExportResult;
use crate::models::{ExportBatch, ExportStatus};

/// Repository trait for ExportBatch persistence.
///
/// Batches are append-only: after creation the only permitted writes are
/// status transitions, the partial-claim record-count reconciliation, and
/// attaching the artifact key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExportBatchRepository: Send + Sync {
    /// Persist a new batch (status `pending`)
    async fn create(&self, batch: ExportBatch) -> ExportResult<ExportBatch>;

    async fn get_by_id(&self, id: Uuid) -> ExportResult<Option<ExportBatch>>;

    /// All batches, newest-first
    async fn list_newest_first(&self) -> ExportResult<Vec<ExportBatch>>;

    /// Most recent batch, if any (admin dashboard)
    async fn latest(&self) -> ExportResult<Option<ExportBatch>>;

    async fn set_status(&self, id: Uuid, status: ExportStatus) -> ExportResult<()>;

    /// Overwrite record_count after a partial claim (concurrent export race)
    async fn reconcile_record_count(&self, id: Uuid, record_count: u32) -> ExportResult<()>;

    /// Record the uploaded artifact key and mark the batch `uploaded`
    async fn attach_file_key(&self, id: Uuid, file_key: String) -> ExportResult<()>;
}
