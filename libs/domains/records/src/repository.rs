use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::RecordResult;
use crate::models::ServiceRecord;

/// Repository trait for ServiceRecord persistence.
///
/// The service layer composes the full record (snapshots included) before
/// handing it to the repository; there is no partial-row write path. The
/// billed transition is NOT here; only the export engine performs it,
/// through its own record-store seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRecordRepository: Send + Sync {
    /// Persist a fully-composed record
    async fn create(&self, record: ServiceRecord) -> RecordResult<ServiceRecord>;

    /// Get a record by ID
    async fn get_by_id(&self, id: Uuid) -> RecordResult<Option<ServiceRecord>>;

    /// Replace a record row (unbilled edits only; enforced by the service)
    async fn update(&self, record: ServiceRecord) -> RecordResult<ServiceRecord>;

    /// A user's own records, newest-first
    async fn list_by_user(&self, user_id: Uuid, limit: u64) -> RecordResult<Vec<ServiceRecord>>;

    /// All records, newest-first (admin)
    async fn list_all(&self) -> RecordResult<Vec<ServiceRecord>>;

    // ---- Dashboard counts ----

    async fn count_unbilled(&self) -> RecordResult<usize>;

    /// Records entered in `[start, end)`
    async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordResult<usize>;

    /// Unbilled records whose service date predates `cutoff`
    async fn count_unbilled_before(&self, cutoff: DateTime<Utc>) -> RecordResult<usize>;

    async fn count_by_user_created_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> RecordResult<usize>;

    async fn count_by_user_unbilled(&self, user_id: Uuid) -> RecordResult<usize>;

    /// Timestamp of the user's most recent entry
    async fn last_entry_at(&self, user_id: Uuid) -> RecordResult<Option<DateTime<Utc>>>;
}
