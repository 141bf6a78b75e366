use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Organization (house account) billed through QuickBooks
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Organization {
    /// Unique identifier
    pub id: Uuid,
    /// Internal display name
    pub name: String,
    /// QBO customer mapping used on invoice rows
    pub qbo_customer_name: String,
    /// Optional memo copied onto invoice rows at export time
    pub invoice_memo: Option<String>,
    /// Exists in the system
    pub active: bool,
    /// Billing blocked
    pub suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Eligible for new service records
    pub fn is_billable(&self) -> bool {
        self.active && !self.suspended
    }
}

/// Live-scan service offered to organizations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    /// QBO product/service mapping used on invoice rows
    pub qbo_item_name: String,
    /// Rate in cents
    pub rate_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DOJ/FBI fee schedule entry, e.g. "DOJ - Standard"
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Fee {
    pub id: Uuid,
    pub label: String,
    /// Amount in cents
    pub amount_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Technician performing the live scan
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Technician {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating an organization
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrganization {
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    #[validate(length(min = 1, max = 160))]
    pub qbo_customer_name: String,
    #[validate(length(max = 500))]
    pub invoice_memo: Option<String>,
}

/// DTO for updating an organization
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganization {
    #[validate(length(min = 1, max = 160))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub qbo_customer_name: Option<String>,
    /// `Some(None)` clears the memo
    #[schema(value_type = Option<String>)]
    pub invoice_memo: Option<Option<String>>,
}

/// DTO for creating a service
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateService {
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    #[validate(length(min = 1, max = 160))]
    pub qbo_item_name: String,
    #[validate(range(min = 0))]
    pub rate_cents: i64,
}

/// DTO for updating a service
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateService {
    #[validate(length(min = 1, max = 160))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub qbo_item_name: Option<String>,
    #[validate(range(min = 0))]
    pub rate_cents: Option<i64>,
}

/// DTO for creating a fee
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateFee {
    #[validate(length(min = 1, max = 120))]
    pub label: String,
    #[validate(range(min = 0))]
    pub amount_cents: i64,
}

/// DTO for updating a fee
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFee {
    #[validate(length(min = 1, max = 120))]
    pub label: Option<String>,
    #[validate(range(min = 0))]
    pub amount_cents: Option<i64>,
}

/// DTO for creating a technician
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTechnician {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// DTO for updating a technician
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTechnician {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
}

impl Organization {
    /// Apply updates from UpdateOrganization DTO
    pub fn apply_update(&mut self, update: UpdateOrganization) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(qbo_customer_name) = update.qbo_customer_name {
            self.qbo_customer_name = qbo_customer_name;
        }
        if let Some(invoice_memo) = update.invoice_memo {
            self.invoice_memo = invoice_memo;
        }
        self.updated_at = Utc::now();
    }
}

impl Service {
    /// Apply updates from UpdateService DTO
    pub fn apply_update(&mut self, update: UpdateService) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(qbo_item_name) = update.qbo_item_name {
            self.qbo_item_name = qbo_item_name;
        }
        if let Some(rate_cents) = update.rate_cents {
            self.rate_cents = rate_cents;
        }
        self.updated_at = Utc::now();
    }
}

impl Fee {
    /// Apply updates from UpdateFee DTO
    pub fn apply_update(&mut self, update: UpdateFee) {
        if let Some(label) = update.label {
            self.label = label;
        }
        if let Some(amount_cents) = update.amount_cents {
            self.amount_cents = amount_cents;
        }
        self.updated_at = Utc::now();
    }
}

impl Technician {
    /// Apply updates from UpdateTechnician DTO
    pub fn apply_update(&mut self, update: UpdateTechnician) {
        if let Some(name) = update.name {
            self.name = name;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> Organization {
        Organization {
            id: Uuid::now_v7(),
            name: "Sunrise Clinic".to_string(),
            qbo_customer_name: "Sunrise Clinic LLC".to_string(),
            invoice_memo: None,
            active: true,
            suspended: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_org_billable() {
        let mut o = org();
        assert!(o.is_billable());

        o.suspended = true;
        assert!(!o.is_billable());

        o.suspended = false;
        o.active = false;
        assert!(!o.is_billable());
    }

    #[test]
    fn test_org_apply_update_clears_memo() {
        let mut o = org();
        o.invoice_memo = Some("Net 14 please".to_string());

        o.apply_update(UpdateOrganization {
            invoice_memo: Some(None),
            ..Default::default()
        });

        assert_eq!(o.invoice_memo, None);
    }

    #[test]
    fn test_org_apply_update_partial() {
        let mut o = org();
        o.apply_update(UpdateOrganization {
            name: Some("Sunset Clinic".to_string()),
            ..Default::default()
        });

        assert_eq!(o.name, "Sunset Clinic");
        assert_eq!(o.qbo_customer_name, "Sunrise Clinic LLC");
    }
}
