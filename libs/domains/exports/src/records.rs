//! Seam to the service-record store.
//!
//! The engine only ever filters unbilled records and flips them to billed;
//! entry-time validation belongs to `domain_records` and is invisible here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ExportResult;
use crate::models::{BillableRecord, DateRange};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillableRecords: Send + Sync {
    /// Unbilled records with a service date inside `range`, optionally
    /// restricted to the given organizations, ordered by organization name
    /// then service date.
    async fn select_unbilled(
        &self,
        range: DateRange,
        organization_ids: Option<Vec<Uuid>>,
    ) -> ExportResult<Vec<BillableRecord>>;

    /// Flip the given records to billed, attributing them to `batch_id`.
    ///
    /// The UPDATE must re-assert `billed = false` so a record claimed by a
    /// concurrent batch between selection and commit is not claimed twice.
    /// Returns the number of rows actually claimed, which may be fewer than
    /// `ids.len()` after losing such a race.
    async fn mark_billed(
        &self,
        ids: Vec<Uuid>,
        batch_id: Uuid,
        billed_at: DateTime<Utc>,
    ) -> ExportResult<u64>;
}
