use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Billing numbers are exactly six digits
pub static BILLING_NUMBER_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^\d{6}$").expect("valid billing number regex"));

/// One billable live-scan transaction.
///
/// Organization/service/fee/technician display fields are snapshots taken at
/// entry time; they are intentionally denormalized and never re-joined to the
/// live catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Date the service was performed
    pub service_date: DateTime<Utc>,

    // Organization reference + snapshots
    pub organization_id: Uuid,
    pub organization_name: String,
    pub organization_qbo_name: String,

    // Applicant
    /// Normalized to upper-case at entry
    pub applicant_name: String,
    /// Exactly six digits
    pub billing_number: String,

    // Service reference + snapshots
    pub service_id: Uuid,
    pub service_name: String,
    pub service_qbo_item_name: String,
    pub service_rate_cents: i64,

    // DOJ/FBI fee reference + snapshots
    pub fee_id: Uuid,
    pub fee_label: String,
    pub fee_amount_cents: i64,

    pub quantity: i32,

    // Technician reference + snapshot
    pub technician_id: Uuid,
    pub technician_name: String,

    // Meta
    pub entered_by: Uuid,
    pub billed: bool,
    pub billed_at: Option<DateTime<Utc>>,
    pub export_batch_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a service record
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRecord {
    pub service_date: DateTime<Utc>,
    pub organization_id: Uuid,
    #[validate(length(min = 1, max = 160))]
    pub applicant_name: String,
    #[validate(regex(path = *BILLING_NUMBER_RE, message = "must be exactly 6 digits"))]
    pub billing_number: String,
    pub service_id: Uuid,
    pub fee_id: Uuid,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub technician_id: Uuid,
}

fn default_quantity() -> i32 {
    1
}

/// DTO for updating a service record (only while unbilled)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRecord {
    pub service_date: Option<DateTime<Utc>>,
    pub organization_id: Option<Uuid>,
    #[validate(length(min = 1, max = 160))]
    pub applicant_name: Option<String>,
    #[validate(regex(path = *BILLING_NUMBER_RE, message = "must be exactly 6 digits"))]
    pub billing_number: Option<String>,
    pub service_id: Option<Uuid>,
    pub fee_id: Option<Uuid>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    pub technician_id: Option<Uuid>,
}

/// Unbilled-backlog counts for the admin dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnbilledStats {
    pub unbilled_count: usize,
    pub entries_this_month: usize,
    pub unbilled_older_than_30_days: usize,
}

/// Per-user entry counts for the staff dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StaffRecordStats {
    pub entries_today: usize,
    pub entries_this_week: usize,
    pub unbilled_entries: usize,
    pub last_entry_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_number_regex() {
        assert!(BILLING_NUMBER_RE.is_match("123456"));
        assert!(!BILLING_NUMBER_RE.is_match("12345"));
        assert!(!BILLING_NUMBER_RE.is_match("1234567"));
        assert!(!BILLING_NUMBER_RE.is_match("12345a"));
        assert!(!BILLING_NUMBER_RE.is_match(""));
    }

    #[test]
    fn test_create_dto_validation() {
        let valid = CreateServiceRecord {
            service_date: Utc::now(),
            organization_id: Uuid::now_v7(),
            applicant_name: "Jane Doe".to_string(),
            billing_number: "123456".to_string(),
            service_id: Uuid::now_v7(),
            fee_id: Uuid::now_v7(),
            quantity: 1,
            technician_id: Uuid::now_v7(),
        };
        assert!(valid.validate().is_ok());

        let bad_billing = CreateServiceRecord {
            billing_number: "12ab56".to_string(),
            ..valid.clone()
        };
        assert!(bad_billing.validate().is_err());

        let bad_quantity = CreateServiceRecord {
            quantity: 0,
            ..valid
        };
        assert!(bad_quantity.validate().is_err());
    }
}
