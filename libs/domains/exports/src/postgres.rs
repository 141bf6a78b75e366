use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::BaseRepository;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{ExportError, ExportResult},
    models::{BillableRecord, DateRange, ExportBatch, ExportStatus},
    records::BillableRecords,
    repository::ExportBatchRepository,
};

pub struct PgExportBatchRepository {
    batches: BaseRepository<entity::Entity>,
}

impl PgExportBatchRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            batches: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.batches.db()
    }
}

#[async_trait]
impl ExportBatchRepository for PgExportBatchRepository {
    async fn create(&self, batch: ExportBatch) -> ExportResult<ExportBatch> {
        let active_model: entity::ActiveModel = batch.into();
        let model = self
            .batches
            .insert(active_model)
            .await
            .map_err(|e| ExportError::Database(e.to_string()))?;

        tracing::info!(batch_id = %model.id, record_count = model.record_count, "Created export batch");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> ExportResult<Option<ExportBatch>> {
        let model = self
            .batches
            .find_by_id(id)
            .await
            .map_err(|e| ExportError::Database(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    async fn list_newest_first(&self) -> ExportResult<Vec<ExportBatch>> {
        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn latest(&self) -> ExportResult<Option<ExportBatch>> {
        let model = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .one(self.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn set_status(&self, id: Uuid, status: ExportStatus) -> ExportResult<()> {
        let active_model = entity::ActiveModel {
            id: ActiveValue::Unchanged(id),
            status: ActiveValue::Set(status),
            ..Default::default()
        };
        self.batches
            .update(active_model)
            .await
            .map_err(|e| ExportError::Database(e.to_string()))?;

        tracing::debug!(batch_id = %id, ?status, "Export batch status transition");
        Ok(())
    }

    async fn reconcile_record_count(&self, id: Uuid, record_count: u32) -> ExportResult<()> {
        let active_model = entity::ActiveModel {
            id: ActiveValue::Unchanged(id),
            record_count: ActiveValue::Set(record_count as i32),
            ..Default::default()
        };
        self.batches
            .update(active_model)
            .await
            .map_err(|e| ExportError::Database(e.to_string()))?;

        Ok(())
    }

    async fn attach_file_key(&self, id: Uuid, file_key: String) -> ExportResult<()> {
        let active_model = entity::ActiveModel {
            id: ActiveValue::Unchanged(id),
            status: ActiveValue::Set(ExportStatus::Uploaded),
            file_key: ActiveValue::Set(Some(file_key)),
            ..Default::default()
        };
        self.batches
            .update(active_model)
            .await
            .map_err(|e| ExportError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Postgres implementation of the record-store seam, over the
/// `service_records` table owned by `domain_records`.
pub struct PgBillableRecords {
    db: DatabaseConnection,
}

impl PgBillableRecords {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

type RecordEntity = domain_records::entity::Entity;
type RecordColumn = domain_records::entity::Column;

#[async_trait]
impl BillableRecords for PgBillableRecords {
    async fn select_unbilled(
        &self,
        range: DateRange,
        organization_ids: Option<Vec<Uuid>>,
    ) -> ExportResult<Vec<BillableRecord>> {
        let mut query = RecordEntity::find()
            .filter(RecordColumn::ServiceDate.gte(range.start))
            .filter(RecordColumn::ServiceDate.lte(range.end))
            .filter(RecordColumn::Billed.eq(false));

        if let Some(ids) = organization_ids {
            query = query.filter(RecordColumn::OrganizationId.is_in(ids));
        }

        let models = query
            .order_by_asc(RecordColumn::OrganizationName)
            .order_by_asc(RecordColumn::ServiceDate)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| BillableRecord {
                id: m.id,
                service_date: m.service_date.into(),
                organization_id: m.organization_id,
                organization_name: m.organization_name,
                organization_qbo_name: m.organization_qbo_name,
                applicant_name: m.applicant_name,
                billing_number: m.billing_number,
                service_name: m.service_name,
                service_qbo_item_name: m.service_qbo_item_name,
                service_rate_cents: m.service_rate_cents,
                fee_amount_cents: m.fee_amount_cents,
                quantity: m.quantity,
                technician_name: m.technician_name,
            })
            .collect())
    }

    async fn mark_billed(
        &self,
        ids: Vec<Uuid>,
        batch_id: Uuid,
        billed_at: DateTime<Utc>,
    ) -> ExportResult<u64> {
        // The billed = false re-assertion is the whole concurrency story:
        // rows already claimed by another batch fall out of the UPDATE.
        let result = RecordEntity::update_many()
            .col_expr(RecordColumn::Billed, Expr::value(true))
            .col_expr(RecordColumn::BilledAt, Expr::value(billed_at))
            .col_expr(RecordColumn::ExportBatchId, Expr::value(batch_id))
            .col_expr(RecordColumn::UpdatedAt, Expr::value(billed_at))
            .filter(RecordColumn::Id.is_in(ids))
            .filter(RecordColumn::Billed.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn record_model(billed: bool) -> domain_records::entity::Model {
        let now = Utc::now().fixed_offset();
        domain_records::entity::Model {
            id: Uuid::now_v7(),
            service_date: now,
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
            entered_by: Uuid::now_v7(),
            billed,
            billed_at: None,
            export_batch_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_mark_billed_returns_claimed_row_count() {
        // Three candidates, but the database only claims two (one lost to a
        // concurrent batch because of the billed = false filter)
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        let repo = PgBillableRecords::new(db);
        let claimed = repo
            .mark_billed(
                vec![Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7()],
                Uuid::now_v7(),
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(claimed, 2);
    }

    #[tokio::test]
    async fn test_select_unbilled_maps_snapshot_fields() {
        let model = record_model(false);
        let expected_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let repo = PgBillableRecords::new(db);
        let range = DateRange::from_days(
            Utc::now().date_naive(),
            Utc::now().date_naive(),
        );
        let records = repo.select_unbilled(range, None).await.unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, expected_id);
        assert_eq!(record.organization_qbo_name, "Sunrise Clinic LLC");
        assert_eq!(record.service_rate_cents, 2500);
        assert_eq!(record.fee_amount_cents, 3200);
    }
}
