use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Output format of an export run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "export_format")]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[sea_orm(string_value = "csv")]
    Csv,
    #[sea_orm(string_value = "xlsx")]
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// Batch lifecycle, advanced step by step by the engine.
///
/// `committed` without a file key marks a run that billed its records but
/// never produced a retrievable artifact; it stays visible in history for
/// manual reconciliation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "export_status")]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "committed")]
    Committed,
    #[sea_orm(string_value = "uploaded")]
    Uploaded,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// One completed (or attempted) export run
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExportBatch {
    pub id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub format: ExportFormat,
    pub status: ExportStatus,
    /// Number of records attributed to this batch
    pub record_count: u32,
    pub exported_by: Uuid,
    pub select_all_organizations: bool,
    /// Explicit filter; empty when select-all
    pub organization_ids: Vec<Uuid>,
    /// Storage locator, set only after a successful upload
    pub file_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /export/monthly`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_export_request"))]
pub struct ExportRequest {
    /// Inclusive UTC day, `YYYY-MM-DD`
    pub start_date: NaiveDate,
    /// Inclusive UTC day, `YYYY-MM-DD`
    pub end_date: NaiveDate,
    pub format: ExportFormat,
    #[serde(default = "default_select_all")]
    pub select_all: bool,
    #[serde(default)]
    pub organization_ids: Vec<Uuid>,
}

fn default_select_all() -> bool {
    true
}

fn validate_export_request(request: &ExportRequest) -> Result<(), ValidationError> {
    if request.start_date > request.end_date {
        return Err(ValidationError::new("date_range")
            .with_message("startDate must not be after endDate".into()));
    }
    if !request.select_all && request.organization_ids.is_empty() {
        return Err(ValidationError::new("organization_ids")
            .with_message("organizationIds must not be empty when selectAll is false".into()));
    }
    Ok(())
}

/// Inclusive UTC range covering whole days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// `[start 00:00:00.000Z, end 23:59:59.999Z]`
    pub fn from_days(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always valid")
                .and_utc(),
            end: end
                .and_hms_milli_opt(23, 59, 59, 999)
                .expect("end of day is always valid")
                .and_utc(),
        }
    }
}

/// Snapshot row the engine bills and renders.
///
/// All display fields were frozen at record entry time; the engine never
/// joins back to the live catalog for them.
#[derive(Debug, Clone)]
pub struct BillableRecord {
    pub id: Uuid,
    pub service_date: DateTime<Utc>,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub organization_qbo_name: String,
    pub applicant_name: String,
    pub billing_number: String,
    pub service_name: String,
    pub service_qbo_item_name: String,
    pub service_rate_cents: i64,
    pub fee_amount_cents: i64,
    pub quantity: i32,
    pub technician_name: String,
}

/// Rendered export returned for immediate download
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// History row with the exporter resolved to an email
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExportHistoryEntry {
    pub id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub format: ExportFormat,
    pub status: ExportStatus,
    pub record_count: u32,
    pub exported_by: Uuid,
    pub exported_by_email: Option<String>,
    pub select_all_organizations: bool,
    pub organization_ids: Vec<Uuid>,
    /// Whether a download is available
    pub has_file: bool,
    pub created_at: DateTime<Utc>,
}

impl ExportHistoryEntry {
    pub fn from_batch(batch: ExportBatch, exported_by_email: Option<String>) -> Self {
        Self {
            id: batch.id,
            start_date: batch.start_date,
            end_date: batch.end_date,
            format: batch.format,
            status: batch.status,
            record_count: batch.record_count,
            exported_by: batch.exported_by,
            exported_by_email,
            select_all_organizations: batch.select_all_organizations,
            organization_ids: batch.organization_ids,
            has_file: batch.file_key.is_some(),
            created_at: batch.created_at,
        }
    }
}

/// Time-limited download link for a stored artifact
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DownloadUrl {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn request() -> ExportRequest {
        ExportRequest {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            format: ExportFormat::Csv,
            select_all: true,
            organization_ids: vec![],
        }
    }

    #[test]
    fn test_request_valid() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_request_rejects_inverted_range() {
        let request = ExportRequest {
            start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            ..request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_rejects_empty_org_filter() {
        let empty_orgs = ExportRequest {
            select_all: false,
            organization_ids: vec![],
            ..request()
        };
        assert!(empty_orgs.validate().is_err());

        let request = ExportRequest {
            select_all: false,
            organization_ids: vec![Uuid::now_v7()],
            ..request()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: ExportRequest = serde_json::from_str(
            r#"{"startDate":"2026-01-01","endDate":"2026-01-31","format":"xlsx","selectAll":false,"organizationIds":["018f4e6e-0000-7000-8000-000000000000"]}"#,
        )
        .unwrap();

        assert_eq!(request.format, ExportFormat::Xlsx);
        assert!(!request.select_all);
        assert_eq!(request.organization_ids.len(), 1);
    }

    #[test]
    fn test_request_defaults_to_select_all() {
        let request: ExportRequest = serde_json::from_str(
            r#"{"startDate":"2026-01-01","endDate":"2026-01-31","format":"csv"}"#,
        )
        .unwrap();

        assert!(request.select_all);
        assert!(request.organization_ids.is_empty());
    }

    #[test]
    fn test_date_range_covers_whole_days() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let range = DateRange::from_days(day, day);

        assert_eq!(range.start.hour(), 0);
        assert_eq!(range.start.minute(), 0);
        assert_eq!(range.end.hour(), 23);
        assert_eq!(range.end.minute(), 59);
        assert_eq!(range.end.second(), 59);
        assert!(range.start < range.end);
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Csv.content_type(), "text/csv");
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
        assert!(ExportFormat::Xlsx.content_type().contains("spreadsheet"));
    }
}
