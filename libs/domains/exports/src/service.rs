use std::sync::Arc;

use chrono::Utc;
use tracing::{instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::directory::OrganizationDirectory;
use crate::error::{ExportError, ExportResult};
use crate::invoice::build_rows;
use crate::models::{DateRange, ExportBatch, ExportFile, ExportRequest, ExportStatus};
use crate::records::BillableRecords;
use crate::render::render;
use crate::repository::ExportBatchRepository;
use crate::storage::{ArtifactStore, SIGNED_URL_TTL};

/// The export/billing engine.
///
/// Orchestrates one export run end to end: select unbilled records, persist
/// the batch, allocate invoice numbers, build and render line items, commit
/// the billed transition, upload the artifact. Generic over its four seams so
/// the whole state machine is testable without Postgres or S3.
#[derive(Clone)]
pub struct ExportService<B, R, O, A>
where
    B: ExportBatchRepository,
    R: BillableRecords,
    O: OrganizationDirectory,
    A: ArtifactStore,
{
    batches: Arc<B>,
    records: Arc<R>,
    organizations: Arc<O>,
    artifacts: Arc<A>,
}

impl<B, R, O, A> ExportService<B, R, O, A>
where
    B: ExportBatchRepository,
    R: BillableRecords,
    O: OrganizationDirectory,
    A: ArtifactStore,
{
    pub fn new(batches: B, records: R, organizations: O, artifacts: A) -> Self {
        Self {
            batches: Arc::new(batches),
            records: Arc::new(records),
            organizations: Arc::new(organizations),
            artifacts: Arc::new(artifacts),
        }
    }

    /// Run one export.
    ///
    /// Failure semantics: validation and an empty candidate set fail with no
    /// side effects. After the batch row exists, a failure before the billing
    /// commit marks it `failed` (best-effort); a failure after the commit
    /// leaves it `committed` with no file key, visible in history for manual
    /// reconciliation. Nothing is rolled back automatically.
    #[instrument(skip(self, request), fields(
        start = %request.start_date,
        end = %request.end_date,
        format = ?request.format,
        exported_by = %exported_by,
    ))]
    pub async fn run_export(
        &self,
        request: ExportRequest,
        exported_by: Uuid,
    ) -> ExportResult<ExportFile> {
        // 1. Validate before touching anything
        request
            .validate()
            .map_err(|e| ExportError::Validation(e.to_string()))?;

        // 2. Select candidates
        let range = DateRange::from_days(request.start_date, request.end_date);
        let org_filter = (!request.select_all).then(|| request.organization_ids.clone());
        let candidates = self.records.select_unbilled(range, org_filter).await?;
        if candidates.is_empty() {
            return Err(ExportError::NoRecords);
        }

        // 3. Persist the batch before any mutation, so the id exists for
        // invoice numbering and a crash from here on is detectable
        let batch = self
            .batches
            .create(ExportBatch {
                id: Uuid::now_v7(),
                start_date: range.start,
                end_date: range.end,
                format: request.format,
                status: ExportStatus::Pending,
                record_count: candidates.len() as u32,
                exported_by,
                select_all_organizations: request.select_all,
                organization_ids: if request.select_all {
                    Vec::new()
                } else {
                    request.organization_ids.clone()
                },
                file_key: None,
                created_at: Utc::now(),
            })
            .await?;

        let executed_at = Utc::now();

        // 4-5. Allocate invoice numbers and build line items
        let mut organization_ids: Vec<Uuid> =
            candidates.iter().map(|r| r.organization_id).collect();
        organization_ids.sort_unstable();
        organization_ids.dedup();

        let memos = match self.organizations.invoice_memos(organization_ids).await {
            Ok(memos) => memos,
            Err(e) => {
                self.mark_failed(batch.id).await;
                return Err(e);
            }
        };
        let rows = build_rows(&candidates, batch.id, executed_at, &memos);

        // 6. Commit the billing transition; first committer wins
        let candidate_ids: Vec<Uuid> = candidates.iter().map(|r| r.id).collect();
        let claimed = match self
            .records
            .mark_billed(candidate_ids, batch.id, executed_at)
            .await
        {
            Ok(claimed) => claimed,
            Err(e) => {
                self.mark_failed(batch.id).await;
                return Err(e);
            }
        };
        if claimed < candidates.len() as u64 {
            warn!(
                batch_id = %batch.id,
                selected = candidates.len(),
                claimed,
                "Concurrent export claimed part of the candidate set; reconciling record count"
            );
            self.batches
                .reconcile_record_count(batch.id, claimed as u32)
                .await?;
        }
        self.batches
            .set_status(batch.id, ExportStatus::Committed)
            .await?;

        // 7. Render
        let bytes = render(&rows, request.format)?;

        // 8. Upload, then attach the key (which also marks the batch uploaded)
        let filename = export_filename(&request);
        let key = artifact_key(batch.id, &filename);
        self.artifacts
            .put(&key, bytes.clone(), request.format.content_type())
            .await?;
        self.batches.attach_file_key(batch.id, key).await?;

        tracing::info!(
            batch_id = %batch.id,
            records = claimed,
            rows = rows.len(),
            %filename,
            "Export completed"
        );

        // 9. Hand the bytes back for immediate download
        Ok(ExportFile {
            bytes,
            filename,
            content_type: request.format.content_type(),
        })
    }

    /// All batches, newest-first
    pub async fn history(&self) -> ExportResult<Vec<ExportBatch>> {
        self.batches.list_newest_first().await
    }

    /// Most recent batch (admin dashboard)
    pub async fn latest(&self) -> ExportResult<Option<ExportBatch>> {
        self.batches.latest().await
    }

    /// Time-limited download link for a batch's stored artifact
    pub async fn download_url(&self, batch_id: Uuid) -> ExportResult<String> {
        let batch = self
            .batches
            .get_by_id(batch_id)
            .await?
            .ok_or_else(|| ExportError::NotFound(format!("Export batch {} not found", batch_id)))?;

        let key = batch.file_key.ok_or_else(|| {
            ExportError::NotFound(format!("Export batch {} has no stored file", batch_id))
        })?;

        self.artifacts.signed_url(&key, SIGNED_URL_TTL).await
    }

    async fn mark_failed(&self, batch_id: Uuid) {
        if let Err(e) = self.batches.set_status(batch_id, ExportStatus::Failed).await {
            warn!(%batch_id, error = %e, "Could not mark export batch failed");
        }
    }
}

/// `LiveScan_HouseAccounts_<start>_to_<end>.<format>`
fn export_filename(request: &ExportRequest) -> String {
    format!(
        "LiveScan_HouseAccounts_{}_to_{}.{}",
        request.start_date,
        request.end_date,
        request.format.extension()
    )
}

/// Keys are namespaced by batch so re-exports never overwrite each other
fn artifact_key(batch_id: Uuid, filename: &str) -> String {
    format!("exports/{}/{}", batch_id, filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use std::collections::HashMap;

    use crate::directory::MockOrganizationDirectory;
    use crate::models::{BillableRecord, ExportFormat};
    use crate::records::MockBillableRecords;
    use crate::repository::MockExportBatchRepository;
    use crate::storage::MockArtifactStore;

    fn request() -> ExportRequest {
        ExportRequest {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            format: ExportFormat::Csv,
            select_all: true,
            organization_ids: vec![],
        }
    }

    fn record(organization_id: Uuid, fee_cents: i64) -> BillableRecord {
        BillableRecord {
            id: Uuid::now_v7(),
            service_date: Utc.with_ymd_and_hms(2026, 1, 12, 15, 30, 0).unwrap(),
            organization_id,
            organization_name: "Sunrise Clinic".to_string(),
            organization_qbo_name: "Sunrise Clinic LLC".to_string(),
            applicant_name: "JANE DOE".to_string(),
            billing_number: "123456".to_string(),
            service_name: "Live Scan".to_string(),
            service_qbo_item_name: "LiveScan Fingerprinting".to_string(),
            service_rate_cents: 2500,
            fee_amount_cents: fee_cents,
            quantity: 1,
            technician_name: "Sam Tech".to_string(),
        }
    }

    fn batch_repo_accepting_all() -> MockExportBatchRepository {
        let mut batches = MockExportBatchRepository::new();
        batches.expect_create().returning(Ok);
        batches.expect_set_status().returning(|_, _| Ok(()));
        batches.expect_attach_file_key().returning(|_, _| Ok(()));
        batches
    }

    fn empty_directory() -> MockOrganizationDirectory {
        let mut organizations = MockOrganizationDirectory::new();
        organizations
            .expect_invoice_memos()
            .returning(|_| Ok(HashMap::new()));
        organizations
    }

    fn accepting_store() -> MockArtifactStore {
        let mut artifacts = MockArtifactStore::new();
        artifacts.expect_put().returning(|_, _, _| Ok(()));
        artifacts
    }

    #[tokio::test]
    async fn test_invalid_range_fails_before_any_side_effect() {
        // No expectations set: any repository call would panic the test
        let service = ExportService::new(
            MockExportBatchRepository::new(),
            MockBillableRecords::new(),
            MockOrganizationDirectory::new(),
            MockArtifactStore::new(),
        );

        let err = service
            .run_export(
                ExportRequest {
                    start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                    end_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                    ..request()
                },
                Uuid::now_v7(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Validation(_)));
    }

    #[tokio::test]
    async fn test_empty_org_filter_fails_validation() {
        let service = ExportService::new(
            MockExportBatchRepository::new(),
            MockBillableRecords::new(),
            MockOrganizationDirectory::new(),
            MockArtifactStore::new(),
        );

        let err = service
            .run_export(
                ExportRequest {
                    select_all: false,
                    organization_ids: vec![],
                    ..request()
                },
                Uuid::now_v7(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Validation(_)));
    }

    #[tokio::test]
    async fn test_no_candidates_creates_no_batch() {
        let mut records = MockBillableRecords::new();
        records.expect_select_unbilled().returning(|_, _| Ok(vec![]));

        // Batch repository has no expectations: creating a batch would panic
        let service = ExportService::new(
            MockExportBatchRepository::new(),
            records,
            MockOrganizationDirectory::new(),
            MockArtifactStore::new(),
        );

        let err = service
            .run_export(request(), Uuid::now_v7())
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::NoRecords));
    }

    #[tokio::test]
    async fn test_selection_uses_day_boundaries_and_filter() {
        let org = Uuid::now_v7();
        let mut records = MockBillableRecords::new();
        records
            .expect_select_unbilled()
            .withf(move |range, filter| {
                range.start.to_rfc3339().starts_with("2026-01-01T00:00:00")
                    && range.end.to_rfc3339().starts_with("2026-01-31T23:59:59")
                    && filter.as_deref() == Some(&[org][..])
            })
            .returning(|_, _| Ok(vec![]));

        let service = ExportService::new(
            MockExportBatchRepository::new(),
            records,
            MockOrganizationDirectory::new(),
            MockArtifactStore::new(),
        );

        let _ = service
            .run_export(
                ExportRequest {
                    select_all: false,
                    organization_ids: vec![org],
                    ..request()
                },
                Uuid::now_v7(),
            )
            .await;
    }

    #[tokio::test]
    async fn test_successful_run_bills_exact_candidate_set() {
        let org_a = Uuid::now_v7();
        let org_b = Uuid::now_v7();
        let candidates = vec![record(org_a, 3200), record(org_a, 3200), record(org_b, 0)];
        let candidate_ids: Vec<Uuid> = candidates.iter().map(|r| r.id).collect();

        let mut batches = MockExportBatchRepository::new();
        batches
            .expect_create()
            .withf(|batch| {
                batch.record_count == 3
                    && batch.status == ExportStatus::Pending
                    && batch.select_all_organizations
                    && batch.organization_ids.is_empty()
                    && batch.file_key.is_none()
            })
            .returning(Ok);
        batches
            .expect_set_status()
            .withf(|_, status| *status == ExportStatus::Committed)
            .times(1)
            .returning(|_, _| Ok(()));
        batches
            .expect_attach_file_key()
            .withf(|_, key| {
                key.starts_with("exports/")
                    && key.ends_with("LiveScan_HouseAccounts_2026-01-01_to_2026-01-31.csv")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let selected = candidates.clone();
        let mut records = MockBillableRecords::new();
        records
            .expect_select_unbilled()
            .returning(move |_, _| Ok(selected.clone()));
        let expected_ids = candidate_ids.clone();
        records
            .expect_mark_billed()
            .withf(move |ids, _, _| *ids == expected_ids)
            .times(1)
            .returning(|ids, _, _| Ok(ids.len() as u64));

        let service = ExportService::new(
            batches,
            records,
            empty_directory(),
            accepting_store(),
        );

        let file = service.run_export(request(), Uuid::now_v7()).await.unwrap();

        assert_eq!(
            file.filename,
            "LiveScan_HouseAccounts_2026-01-01_to_2026-01-31.csv"
        );
        assert_eq!(file.content_type, "text/csv");

        // 2 org-A records with fees (4 rows) + 1 fee-less org-B record (1 row)
        let text = String::from_utf8(file.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);

        // One invoice number per organization, shared across its lines
        let invoice_of = |line: &str| line.split(',').next().unwrap().to_string();
        assert_eq!(invoice_of(lines[1]), invoice_of(lines[2]));
        assert_eq!(invoice_of(lines[1]), invoice_of(lines[3]));
        assert_eq!(invoice_of(lines[1]), invoice_of(lines[4]));
        assert_ne!(invoice_of(lines[1]), invoice_of(lines[5]));
    }

    #[tokio::test]
    async fn test_partial_claim_reconciles_record_count() {
        let org = Uuid::now_v7();
        let candidates = vec![record(org, 0), record(org, 0), record(org, 0)];

        let mut batches = batch_repo_accepting_all();
        batches
            .expect_reconcile_record_count()
            .withf(|_, count| *count == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let selected = candidates.clone();
        let mut records = MockBillableRecords::new();
        records
            .expect_select_unbilled()
            .returning(move |_, _| Ok(selected.clone()));
        // A concurrent export claimed one of the three
        records.expect_mark_billed().returning(|_, _, _| Ok(2));

        let service = ExportService::new(
            batches,
            records,
            empty_directory(),
            accepting_store(),
        );

        // Partial claim is a warning, not a failure
        assert!(service.run_export(request(), Uuid::now_v7()).await.is_ok());
    }

    #[tokio::test]
    async fn test_memo_lookup_failure_marks_batch_failed() {
        let candidates = vec![record(Uuid::now_v7(), 0)];

        let mut batches = MockExportBatchRepository::new();
        batches.expect_create().returning(Ok);
        batches
            .expect_set_status()
            .withf(|_, status| *status == ExportStatus::Failed)
            .times(1)
            .returning(|_, _| Ok(()));

        let selected = candidates.clone();
        let mut records = MockBillableRecords::new();
        records
            .expect_select_unbilled()
            .returning(move |_, _| Ok(selected.clone()));

        let mut organizations = MockOrganizationDirectory::new();
        organizations
            .expect_invoice_memos()
            .returning(|_| Err(ExportError::Database("connection lost".to_string())));

        let service = ExportService::new(
            batches,
            records,
            organizations,
            MockArtifactStore::new(),
        );

        let err = service
            .run_export(request(), Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Database(_)));
    }

    #[tokio::test]
    async fn test_upload_failure_leaves_batch_committed() {
        let candidates = vec![record(Uuid::now_v7(), 0)];

        let mut batches = MockExportBatchRepository::new();
        batches.expect_create().returning(Ok);
        // Only the commit transition may happen; a Failed transition or an
        // attach_file_key call would panic the test
        batches
            .expect_set_status()
            .withf(|_, status| *status == ExportStatus::Committed)
            .times(1)
            .returning(|_, _| Ok(()));

        let selected = candidates.clone();
        let mut records = MockBillableRecords::new();
        records
            .expect_select_unbilled()
            .returning(move |_, _| Ok(selected.clone()));
        records.expect_mark_billed().returning(|_, _, _| Ok(1));

        let mut artifacts = MockArtifactStore::new();
        artifacts
            .expect_put()
            .returning(|_, _, _| Err(ExportError::Storage("network".to_string())));

        let service = ExportService::new(batches, records, empty_directory(), artifacts);

        let err = service
            .run_export(request(), Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Storage(_)));
    }

    #[tokio::test]
    async fn test_download_url_requires_file_key() {
        let batch = ExportBatch {
            id: Uuid::now_v7(),
            start_date: Utc::now(),
            end_date: Utc::now(),
            format: ExportFormat::Csv,
            status: ExportStatus::Committed,
            record_count: 3,
            exported_by: Uuid::now_v7(),
            select_all_organizations: true,
            organization_ids: vec![],
            file_key: None,
            created_at: Utc::now(),
        };
        let batch_id = batch.id;

        let mut batches = MockExportBatchRepository::new();
        batches
            .expect_get_by_id()
            .returning(move |_| Ok(Some(batch.clone())));

        let service = ExportService::new(
            batches,
            MockBillableRecords::new(),
            MockOrganizationDirectory::new(),
            MockArtifactStore::new(),
        );

        let err = service.download_url(batch_id).await.unwrap_err();
        assert!(matches!(err, ExportError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_download_url_signs_stored_key() {
        let mut batch = ExportBatch {
            id: Uuid::now_v7(),
            start_date: Utc::now(),
            end_date: Utc::now(),
            format: ExportFormat::Xlsx,
            status: ExportStatus::Uploaded,
            record_count: 3,
            exported_by: Uuid::now_v7(),
            select_all_organizations: true,
            organization_ids: vec![],
            file_key: None,
            created_at: Utc::now(),
        };
        batch.file_key = Some(format!("exports/{}/report.xlsx", batch.id));
        let batch_id = batch.id;

        let mut batches = MockExportBatchRepository::new();
        batches
            .expect_get_by_id()
            .returning(move |_| Ok(Some(batch.clone())));

        let mut artifacts = MockArtifactStore::new();
        artifacts
            .expect_signed_url()
            .withf(|key, ttl| key.starts_with("exports/") && *ttl == SIGNED_URL_TTL)
            .returning(|key, _| Ok(format!("https://storage.example.com/{}?sig=abc", key)));

        let service = ExportService::new(
            batches,
            MockBillableRecords::new(),
            MockOrganizationDirectory::new(),
            artifacts,
        );

        let url = service.download_url(batch_id).await.unwrap();
        assert!(url.starts_with("https://"));
    }

    #[tokio::test]
    async fn test_download_url_unknown_batch() {
        let mut batches = MockExportBatchRepository::new();
        batches.expect_get_by_id().returning(|_| Ok(None));

        let service = ExportService::new(
            batches,
            MockBillableRecords::new(),
            MockOrganizationDirectory::new(),
            MockArtifactStore::new(),
        );

        let err = service.download_url(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ExportError::NotFound(_)));
    }
}
