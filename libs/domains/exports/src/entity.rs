use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::models::{ExportBatch, ExportFormat, ExportStatus};

/// SeaORM Entity for the export_batches table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "export_batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub format: ExportFormat,
    pub status: ExportStatus,
    pub record_count: i32,
    pub exported_by: Uuid,
    pub select_all_organizations: bool,
    /// JSON array of organization UUIDs; empty when select-all
    pub organization_ids: Json,
    pub file_key: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ExportBatch {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            start_date: model.start_date.into(),
            end_date: model.end_date.into(),
            format: model.format,
            status: model.status,
            record_count: model.record_count.max(0) as u32,
            exported_by: model.exported_by,
            select_all_organizations: model.select_all_organizations,
            organization_ids: serde_json::from_value(model.organization_ids).unwrap_or_default(),
            file_key: model.file_key,
            created_at: model.created_at.into(),
        }
    }
}

impl From<ExportBatch> for ActiveModel {
    fn from(batch: ExportBatch) -> Self {
        ActiveModel {
            id: Set(batch.id),
            start_date: Set(batch.start_date.into()),
            end_date: Set(batch.end_date.into()),
            format: Set(batch.format),
            status: Set(batch.status),
            record_count: Set(batch.record_count as i32),
            exported_by: Set(batch.exported_by),
            select_all_organizations: Set(batch.select_all_organizations),
            organization_ids: Set(
                serde_json::to_value(&batch.organization_ids).unwrap_or_default()
            ),
            file_key: Set(batch.file_key),
            created_at: Set(batch.created_at.into()),
        }
    }
}
