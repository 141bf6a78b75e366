//! Row-set rendering into the two supported invoice formats.

use rust_xlsxwriter::Workbook;

use crate::error::{ExportError, ExportResult};
use crate::invoice::{format_cents, format_mdy, InvoiceRow};
use crate::models::ExportFormat;

const WORKSHEET_NAME: &str = "Monthly Export";

pub fn render(rows: &[InvoiceRow], format: ExportFormat) -> ExportResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => render_csv(rows),
        ExportFormat::Xlsx => render_xlsx(rows),
    }
}

/// Flat delimited rows, header row first
fn render_csv(rows: &[InvoiceRow]) -> ExportResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(InvoiceRow::HEADERS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Render(e.to_string()))
}

/// Single worksheet, header row plus typed cells (numbers stay numbers)
fn render_xlsx(rows: &[InvoiceRow]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(WORKSHEET_NAME)?;

    for (col, header) in InvoiceRow::HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, &row.invoice_number)?;
        worksheet.write_string(r, 1, &row.customer)?;
        worksheet.write_string(r, 2, format_mdy(row.invoice_date))?;
        worksheet.write_string(r, 3, format_mdy(row.due_date))?;
        worksheet.write_string(r, 4, row.terms)?;
        worksheet.write_string(r, 5, &row.product)?;
        worksheet.write_number(r, 6, f64::from(row.quantity))?;
        worksheet.write_number(r, 7, row.rate_cents as f64 / 100.0)?;
        worksheet.write_number(r, 8, row.amount_cents as f64 / 100.0)?;
        worksheet.write_string(r, 9, row.memo.as_deref().unwrap_or_default())?;
        worksheet.write_string(r, 10, &row.organization)?;
        worksheet.write_string(r, 11, row.service_date.to_string())?;
        worksheet.write_string(r, 12, &row.applicant)?;
        worksheet.write_string(r, 13, &row.billing_number)?;
        worksheet.write_string(r, 14, &row.technician)?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use uuid::Uuid;

    use crate::invoice::build_rows;
    use crate::models::BillableRecord;

    fn rows() -> Vec<InvoiceRow> {
        let record = BillableRecord {
            id: Uuid::now_v7(),
            service_date: NaiveDate::from_ymd_opt(2026, 1, 12)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
                .and_utc(),
            organization_id: Uuid::now_v7(),
            organization_name: "Sunrise Clinic".to_string(),
            organization_qbo_name: "Sunrise, Clinic LLC".to_string(),
            applicant_name: "JANE DOE".to_string(),
            billing_number: "123456".to_string(),
            service_name: "Live Scan".to_string(),
            service_qbo_item_name: "LiveScan Fingerprinting".to_string(),
            service_rate_cents: 2500,
            fee_amount_cents: 3200,
            quantity: 1,
            technician_name: "Sam Tech".to_string(),
        };
        build_rows(
            &[record],
            Uuid::now_v7(),
            chrono::Utc::now(),
            &HashMap::new(),
        )
    }

    #[test]
    fn test_csv_has_header_and_row_per_line_item() {
        let bytes = render(&rows(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3); // header + service + fee
        assert!(lines[0].starts_with("Invoice No,Customer,Invoice Date"));
        assert!(lines[1].contains("LiveScan Fingerprinting"));
        assert!(lines[2].contains("DOJ/FBI Fee"));
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let bytes = render(&rows(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("\"Sunrise, Clinic LLC\""));
    }

    #[test]
    fn test_csv_empty_rowset_is_header_only() {
        let bytes = render(&[], ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_xlsx_produces_zip_container() {
        let bytes = render(&rows(), ExportFormat::Xlsx).unwrap();

        // XLSX files are zip archives
        assert_eq!(&bytes[..2], b"PK");
        assert!(bytes.len() > 500);
    }
}
