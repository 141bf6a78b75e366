use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// SeaORM Entity for the service_records table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_date: DateTimeWithTimeZone,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub organization_qbo_name: String,
    pub applicant_name: String,
    pub billing_number: String,
    pub service_id: Uuid,
    pub service_name: String,
    pub service_qbo_item_name: String,
    pub service_rate_cents: i64,
    pub fee_id: Uuid,
    pub fee_label: String,
    pub fee_amount_cents: i64,
    pub quantity: i32,
    pub technician_id: Uuid,
    pub technician_name: String,
    pub entered_by: Uuid,
    pub billed: bool,
    pub billed_at: Option<DateTimeWithTimeZone>,
    pub export_batch_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from SeaORM Model to domain ServiceRecord
impl From<Model> for crate::models::ServiceRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            service_date: model.service_date.into(),
            organization_id: model.organization_id,
            organization_name: model.organization_name,
            organization_qbo_name: model.organization_qbo_name,
            applicant_name: model.applicant_name,
            billing_number: model.billing_number,
            service_id: model.service_id,
            service_name: model.service_name,
            service_qbo_item_name: model.service_qbo_item_name,
            service_rate_cents: model.service_rate_cents,
            fee_id: model.fee_id,
            fee_label: model.fee_label,
            fee_amount_cents: model.fee_amount_cents,
            quantity: model.quantity,
            technician_id: model.technician_id,
            technician_name: model.technician_name,
            entered_by: model.entered_by,
            billed: model.billed,
            billed_at: model.billed_at.map(Into::into),
            export_batch_id: model.export_batch_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Full-row ActiveModel for inserts and updates
impl From<crate::models::ServiceRecord> for ActiveModel {
    fn from(record: crate::models::ServiceRecord) -> Self {
        ActiveModel {
            id: Set(record.id),
            service_date: Set(record.service_date.into()),
            organization_id: Set(record.organization_id),
            organization_name: Set(record.organization_name),
            organization_qbo_name: Set(record.organization_qbo_name),
            applicant_name: Set(record.applicant_name),
            billing_number: Set(record.billing_number),
            service_id: Set(record.service_id),
            service_name: Set(record.service_name),
            service_qbo_item_name: Set(record.service_qbo_item_name),
            service_rate_cents: Set(record.service_rate_cents),
            fee_id: Set(record.fee_id),
            fee_label: Set(record.fee_label),
            fee_amount_cents: Set(record.fee_amount_cents),
            quantity: Set(record.quantity),
            technician_id: Set(record.technician_id),
            technician_name: Set(record.technician_name),
            entered_by: Set(record.entered_by),
            billed: Set(record.billed),
            billed_at: Set(record.billed_at.map(Into::into)),
            export_batch_id: Set(record.export_batch_id),
            created_at: Set(record.created_at.into()),
            updated_at: Set(record.updated_at.into()),
        }
    }
}
