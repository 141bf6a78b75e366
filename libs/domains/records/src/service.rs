use std::sync::Arc;

use chrono::{Datelike, Duration, Utc};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{RecordError, RecordResult};
use crate::models::{
    CreateServiceRecord, ServiceRecord, StaffRecordStats, UnbilledStats, UpdateServiceRecord,
};
use crate::reference::ReferenceData;
use crate::repository::ServiceRecordRepository;

/// Service layer for record entry and queries.
///
/// Snapshotting happens here: the referenced catalog rows are resolved through
/// the [`ReferenceData`] seam at create/edit time and their display values are
/// copied onto the record.
#[derive(Clone)]
pub struct RecordService<R, D>
where
    R: ServiceRecordRepository,
    D: ReferenceData,
{
    repository: Arc<R>,
    reference: Arc<D>,
}

impl<R, D> RecordService<R, D>
where
    R: ServiceRecordRepository,
    D: ReferenceData,
{
    pub fn new(repository: R, reference: D) -> Self {
        Self {
            repository: Arc::new(repository),
            reference: Arc::new(reference),
        }
    }

    #[instrument(skip(self, input), fields(organization_id = %input.organization_id))]
    pub async fn create(
        &self,
        input: CreateServiceRecord,
        entered_by: Uuid,
    ) -> RecordResult<ServiceRecord> {
        input
            .validate()
            .map_err(|e| RecordError::Validation(e.to_string()))?;

        let org = self
            .reference
            .billable_organization(input.organization_id)
            .await?
            .ok_or_else(|| {
                RecordError::Validation("Organization is not available for billing".to_string())
            })?;
        let service = self
            .reference
            .active_service(input.service_id)
            .await?
            .ok_or_else(|| RecordError::Validation("Service is not active".to_string()))?;
        let fee = self
            .reference
            .active_fee(input.fee_id)
            .await?
            .ok_or_else(|| RecordError::Validation("Fee is not active".to_string()))?;
        let technician = self
            .reference
            .active_technician(input.technician_id)
            .await?
            .ok_or_else(|| RecordError::Validation("Technician is not active".to_string()))?;

        let now = Utc::now();
        let record = ServiceRecord {
            id: Uuid::now_v7(),
            service_date: input.service_date,
            organization_id: org.id,
            organization_name: org.name,
            organization_qbo_name: org.qbo_customer_name,
            applicant_name: input.applicant_name.trim().to_uppercase(),
            billing_number: input.billing_number,
            service_id: service.id,
            service_name: service.name,
            service_qbo_item_name: service.qbo_item_name,
            service_rate_cents: service.rate_cents,
            fee_id: fee.id,
            fee_label: fee.label,
            fee_amount_cents: fee.amount_cents,
            quantity: input.quantity,
            technician_id: technician.id,
            technician_name: technician.name,
            entered_by,
            billed: false,
            billed_at: None,
            export_batch_id: None,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(record).await
    }

    /// Edit an unbilled record.
    ///
    /// Staff may only edit their own entries; admins may edit any. Changing a
    /// reference re-validates eligibility and re-snapshots the display values.
    #[instrument(skip(self, input), fields(record_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateServiceRecord,
        actor_id: Uuid,
        actor_is_admin: bool,
    ) -> RecordResult<ServiceRecord> {
        input
            .validate()
            .map_err(|e| RecordError::Validation(e.to_string()))?;

        let mut record = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(RecordError::NotFound(id))?;

        if record.billed {
            return Err(RecordError::BilledImmutable);
        }
        if !actor_is_admin && record.entered_by != actor_id {
            return Err(RecordError::Forbidden(
                "You can only edit your own entries".to_string(),
            ));
        }

        if let Some(organization_id) = input.organization_id {
            let org = self
                .reference
                .billable_organization(organization_id)
                .await?
                .ok_or_else(|| {
                    RecordError::Validation("Organization is not available for billing".to_string())
                })?;
            record.organization_id = org.id;
            record.organization_name = org.name;
            record.organization_qbo_name = org.qbo_customer_name;
        }
        if let Some(service_id) = input.service_id {
            let service = self
                .reference
                .active_service(service_id)
                .await?
                .ok_or_else(|| RecordError::Validation("Service is not active".to_string()))?;
            record.service_id = service.id;
            record.service_name = service.name;
            record.service_qbo_item_name = service.qbo_item_name;
            record.service_rate_cents = service.rate_cents;
        }
        if let Some(fee_id) = input.fee_id {
            let fee = self
                .reference
                .active_fee(fee_id)
                .await?
                .ok_or_else(|| RecordError::Validation("Fee is not active".to_string()))?;
            record.fee_id = fee.id;
            record.fee_label = fee.label;
            record.fee_amount_cents = fee.amount_cents;
        }
        if let Some(technician_id) = input.technician_id {
            let technician = self
                .reference
                .active_technician(technician_id)
                .await?
                .ok_or_else(|| RecordError::Validation("Technician is not active".to_string()))?;
            record.technician_id = technician.id;
            record.technician_name = technician.name;
        }

        if let Some(service_date) = input.service_date {
            record.service_date = service_date;
        }
        if let Some(applicant_name) = input.applicant_name {
            record.applicant_name = applicant_name.trim().to_uppercase();
        }
        if let Some(billing_number) = input.billing_number {
            record.billing_number = billing_number;
        }
        if let Some(quantity) = input.quantity {
            record.quantity = quantity;
        }
        record.updated_at = Utc::now();

        self.repository.update(record).await
    }

    pub async fn get(
        &self,
        id: Uuid,
        actor_id: Uuid,
        actor_is_admin: bool,
    ) -> RecordResult<ServiceRecord> {
        let record = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(RecordError::NotFound(id))?;

        if !actor_is_admin && record.entered_by != actor_id {
            return Err(RecordError::Forbidden(
                "You can only view your own entries".to_string(),
            ));
        }

        Ok(record)
    }

    /// The caller's recent entries, newest-first
    pub async fn list_mine(&self, user_id: Uuid) -> RecordResult<Vec<ServiceRecord>> {
        self.repository.list_by_user(user_id, 50).await
    }

    pub async fn list_all(&self) -> RecordResult<Vec<ServiceRecord>> {
        self.repository.list_all().await
    }

    /// Backlog counts for the admin dashboard
    pub async fn unbilled_stats(&self) -> RecordResult<UnbilledStats> {
        let now = Utc::now();
        let start_of_month = now
            .date_naive()
            .with_day(1)
            .expect("first of month is always valid")
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc();
        let start_of_next_month = if start_of_month.month() == 12 {
            start_of_month
                .with_year(start_of_month.year() + 1)
                .and_then(|d| d.with_month(1))
        } else {
            start_of_month.with_month(start_of_month.month() + 1)
        }
        .expect("first of next month is always valid");
        let thirty_days_ago = now - Duration::days(30);

        Ok(UnbilledStats {
            unbilled_count: self.repository.count_unbilled().await?,
            entries_this_month: self
                .repository
                .count_created_between(start_of_month, start_of_next_month)
                .await?,
            unbilled_older_than_30_days: self
                .repository
                .count_unbilled_before(thirty_days_ago)
                .await?,
        })
    }

    /// Per-user entry counts for the staff dashboard (weeks start Sunday)
    pub async fn staff_stats(&self, user_id: Uuid) -> RecordResult<StaffRecordStats> {
        let now = Utc::now();
        let start_of_today = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc();
        let start_of_week =
            start_of_today - Duration::days(now.weekday().num_days_from_sunday() as i64);

        Ok(StaffRecordStats {
            entries_today: self
                .repository
                .count_by_user_created_since(user_id, start_of_today)
                .await?,
            entries_this_week: self
                .repository
                .count_by_user_created_since(user_id, start_of_week)
                .await?,
            unbilled_entries: self.repository.count_by_user_unbilled(user_id).await?,
            last_entry_at: self.repository.last_entry_at(user_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{
        FeeRef, MockReferenceData, OrganizationRef, ServiceRef, TechnicianRef,
    };
    use crate::repository::MockServiceRecordRepository;

    fn create_input() -> CreateServiceRecord {
        CreateServiceRecord {
            service_date: Utc::now(),
            organization_id: Uuid::now_v7(),
            applicant_name: "jane doe".to_string(),
            billing_number: "123456".to_string(),
            service_id: Uuid::now_v7(),
            fee_id: Uuid::now_v7(),
            quantity: 1,
            technician_id: Uuid::now_v7(),
        }
    }

    fn reference_with_all_active() -> MockReferenceData {
        let mut reference = MockReferenceData::new();
        reference.expect_billable_organization().returning(|id| {
            Ok(Some(OrganizationRef {
                id,
                name: "Sunrise Clinic".to_string(),
                qbo_customer_name: "Sunrise Clinic LLC".to_string(),
            }))
        });
        reference.expect_active_service().returning(|id| {
            Ok(Some(ServiceRef {
                id,
                name: "Live Scan".to_string(),
                qbo_item_name: "LiveScan Fingerprinting".to_string(),
                rate_cents: 2500,
            }))
        });
        reference.expect_active_fee().returning(|id| {
            Ok(Some(FeeRef {
                id,
                label: "DOJ".to_string(),
                amount_cents: 3200,
            }))
        });
        reference.expect_active_technician().returning(|id| {
            Ok(Some(TechnicianRef {
                id,
                name: "Sam Tech".to_string(),
            }))
        });
        reference
    }

    fn unbilled_record(entered_by: Uuid) -> ServiceRecord {
        ServiceRecord {
            id: Uuid::now_v7(),
            service_date: Utc::now(),
            organization_id: Uuid::now_v7(),
            organization_name: "Sunrise Clinic".to_string(),
            organization_qbo_name: "Sunrise Clinic LLC".to_string(),
            applicant_name: "JANE DOE".to_string(),
            billing_number: "123456".to_string(),
            service_id: Uuid::now_v7(),
            service_name: "Live Scan".to_string(),
            service_qbo_item_name: "LiveScan Fingerprinting".to_string(),
            service_rate_cents: 2500,
            fee_id: Uuid::now_v7(),
            fee_label: "DOJ".to_string(),
            fee_amount_cents: 3200,
            quantity: 1,
            technician_id: Uuid::now_v7(),
            technician_name: "Sam Tech".to_string(),
            entered_by,
            billed: false,
            billed_at: None,
            export_batch_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_snapshots_and_normalizes() {
        let mut repo = MockServiceRecordRepository::new();
        repo.expect_create().returning(Ok);

        let service = RecordService::new(repo, reference_with_all_active());
        let entered_by = Uuid::now_v7();
        let record = service.create(create_input(), entered_by).await.unwrap();

        assert_eq!(record.applicant_name, "JANE DOE");
        assert_eq!(record.organization_qbo_name, "Sunrise Clinic LLC");
        assert_eq!(record.service_rate_cents, 2500);
        assert_eq!(record.fee_amount_cents, 3200);
        assert_eq!(record.entered_by, entered_by);
        assert!(!record.billed);
        assert!(record.export_batch_id.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_suspended_organization() {
        let repo = MockServiceRecordRepository::new();
        let mut reference = MockReferenceData::new();
        reference
            .expect_billable_organization()
            .returning(|_| Ok(None));

        let service = RecordService::new(repo, reference);
        let err = service
            .create(create_input(), Uuid::now_v7())
            .await
            .unwrap_err();

        assert!(matches!(err, RecordError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_billing_number() {
        let service = RecordService::new(
            MockServiceRecordRepository::new(),
            MockReferenceData::new(),
        );

        let err = service
            .create(
                CreateServiceRecord {
                    billing_number: "12345".to_string(),
                    ..create_input()
                },
                Uuid::now_v7(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecordError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_billed_record() {
        let staff = Uuid::now_v7();
        let mut record = unbilled_record(staff);
        record.billed = true;
        record.export_batch_id = Some(Uuid::now_v7());
        let record_id = record.id;

        let mut repo = MockServiceRecordRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(record.clone())));

        let service = RecordService::new(repo, MockReferenceData::new());
        let err = service
            .update(record_id, UpdateServiceRecord::default(), staff, true)
            .await
            .unwrap_err();

        assert!(matches!(err, RecordError::BilledImmutable));
    }

    #[tokio::test]
    async fn test_update_rejects_other_users_record_for_staff() {
        let owner = Uuid::now_v7();
        let record = unbilled_record(owner);
        let record_id = record.id;

        let mut repo = MockServiceRecordRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(record.clone())));

        let service = RecordService::new(repo, MockReferenceData::new());
        let err = service
            .update(
                record_id,
                UpdateServiceRecord::default(),
                Uuid::now_v7(),
                false,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecordError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_resnapshots_changed_service() {
        let staff = Uuid::now_v7();
        let record = unbilled_record(staff);
        let record_id = record.id;

        let mut repo = MockServiceRecordRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(record.clone())));
        repo.expect_update().returning(Ok);

        let new_service_id = Uuid::now_v7();
        let mut reference = MockReferenceData::new();
        reference.expect_active_service().returning(|id| {
            Ok(Some(ServiceRef {
                id,
                name: "Notary".to_string(),
                qbo_item_name: "Notary Service".to_string(),
                rate_cents: 1500,
            }))
        });

        let service = RecordService::new(repo, reference);
        let updated = service
            .update(
                record_id,
                UpdateServiceRecord {
                    service_id: Some(new_service_id),
                    ..Default::default()
                },
                staff,
                false,
            )
            .await
            .unwrap();

        assert_eq!(updated.service_id, new_service_id);
        assert_eq!(updated.service_qbo_item_name, "Notary Service");
        assert_eq!(updated.service_rate_cents, 1500);
        // Untouched snapshots survive
        assert_eq!(updated.organization_name, "Sunrise Clinic");
    }

    #[tokio::test]
    async fn test_get_allows_admin_any_record() {
        let record = unbilled_record(Uuid::now_v7());
        let record_id = record.id;

        let mut repo = MockServiceRecordRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(record.clone())));

        let service = RecordService::new(repo, MockReferenceData::new());
        assert!(service.get(record_id, Uuid::now_v7(), true).await.is_ok());
    }
}
