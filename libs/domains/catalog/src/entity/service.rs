use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// SeaORM Entity for the services table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub qbo_item_name: String,
    pub rate_cents: i64,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Service {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            qbo_item_name: model.qbo_item_name,
            rate_cents: model.rate_cents,
            active: model.active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::CreateService> for ActiveModel {
    fn from(input: crate::models::CreateService) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            qbo_item_name: Set(input.qbo_item_name),
            rate_cents: Set(input.rate_cents),
            active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}

impl From<crate::models::Service> for ActiveModel {
    fn from(service: crate::models::Service) -> Self {
        ActiveModel {
            id: Set(service.id),
            name: Set(service.name),
            qbo_item_name: Set(service.qbo_item_name),
            rate_cents: Set(service.rate_cents),
            active: Set(service.active),
            created_at: Set(service.created_at.into()),
            updated_at: Set(service.updated_at.into()),
        }
    }
}
