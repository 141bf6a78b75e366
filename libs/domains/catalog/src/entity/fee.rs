use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// SeaORM Entity for the fees table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub label: String,
    pub amount_cents: i64,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Fee {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            label: model.label,
            amount_cents: model.amount_cents,
            active: model.active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::CreateFee> for ActiveModel {
    fn from(input: crate::models::CreateFee) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            label: Set(input.label),
            amount_cents: Set(input.amount_cents),
            active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}

impl From<crate::models::Fee> for ActiveModel {
    fn from(fee: crate::models::Fee) -> Self {
        ActiveModel {
            id: Set(fee.id),
            label: Set(fee.label),
            amount_cents: Set(fee.amount_cents),
            active: Set(fee.active),
            created_at: Set(fee.created_at.into()),
            updated_at: Set(fee.updated_at.into()),
        }
    }
}
