use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// SeaORM Entity for the organizations table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub qbo_customer_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub invoice_memo: Option<String>,
    pub active: bool,
    pub suspended: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from SeaORM Model to domain Organization
impl From<Model> for crate::models::Organization {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            qbo_customer_name: model.qbo_customer_name,
            invoice_memo: model.invoice_memo,
            active: model.active,
            suspended: model.suspended,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Conversion from domain CreateOrganization to SeaORM ActiveModel
impl From<crate::models::CreateOrganization> for ActiveModel {
    fn from(input: crate::models::CreateOrganization) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            qbo_customer_name: Set(input.qbo_customer_name),
            invoice_memo: Set(input.invoice_memo),
            active: Set(true),
            suspended: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}

// Full-row ActiveModel for updates
impl From<crate::models::Organization> for ActiveModel {
    fn from(org: crate::models::Organization) -> Self {
        ActiveModel {
            id: Set(org.id),
            name: Set(org.name),
            qbo_customer_name: Set(org.qbo_customer_name),
            invoice_memo: Set(org.invoice_memo),
            active: Set(org.active),
            suspended: Set(org.suspended),
            created_at: Set(org.created_at.into()),
            updated_at: Set(org.updated_at.into()),
        }
    }
}
