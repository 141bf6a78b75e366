//! Invoice-number allocation and line-item building.
//!
//! One invoice number per organization per batch, derived from the batch and
//! organization ids, so re-running the same organizations in a later batch
//! yields fresh numbers without any counter state.

use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::BillableRecord;

/// Fixed product identifier for the pass-through DOJ/FBI fee line
pub const FEE_PRODUCT: &str = "DOJ/FBI Fee";

/// Payment terms stamped on every line
pub const PAYMENT_TERMS: &str = "Net 14";

/// Calendar days from invoice date to due date
pub const DUE_DAYS: u64 = 14;

/// Derive the shared invoice number for an organization within a batch.
///
/// Uses the first eight hex digits of each id; distinct organizations in one
/// batch can never collide, and the same organization gets a different number
/// in every batch.
pub fn invoice_number(batch_id: Uuid, organization_id: Uuid) -> String {
    let batch = batch_id.simple().to_string();
    let org = organization_id.simple().to_string();
    format!("INV-{}-{}", &batch[..8], &org[..8]).to_uppercase()
}

/// One output line of the export file
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRow {
    pub invoice_number: String,
    /// QBO customer (organization's QBO mapping)
    pub customer: String,
    /// Export execution date
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub terms: &'static str,
    /// QBO product/service item
    pub product: String,
    pub quantity: i32,
    pub rate_cents: i64,
    pub amount_cents: i64,
    pub memo: Option<String>,
    // Audit columns, ignored by QBO
    pub organization: String,
    pub service_date: NaiveDate,
    pub applicant: String,
    pub billing_number: String,
    pub technician: String,
}

impl InvoiceRow {
    pub const HEADERS: [&'static str; 15] = [
        "Invoice No",
        "Customer",
        "Invoice Date",
        "Due Date",
        "Terms",
        "Product/Service",
        "Qty",
        "Rate",
        "Amount",
        "Memo",
        "Organization",
        "ServiceDate",
        "Applicant",
        "BillingNumber",
        "Technician",
    ];

    /// Flat string record in [`Self::HEADERS`] order
    pub fn to_record(&self) -> [String; 15] {
        [
            self.invoice_number.clone(),
            self.customer.clone(),
            format_mdy(self.invoice_date),
            format_mdy(self.due_date),
            self.terms.to_string(),
            self.product.clone(),
            self.quantity.to_string(),
            format_cents(self.rate_cents),
            format_cents(self.amount_cents),
            self.memo.clone().unwrap_or_default(),
            self.organization.clone(),
            self.service_date.to_string(),
            self.applicant.clone(),
            self.billing_number.clone(),
            self.technician.clone(),
        ]
    }
}

/// `MM/DD/YYYY`, the format QBO imports expect
pub fn format_mdy(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// Integer cents as decimal dollars, e.g. 3250 -> "32.50"
pub fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Build the full row set for a batch.
///
/// Per record: one service line, plus a fee line iff the snapshotted fee
/// amount is nonzero. Invoice and due dates come from the execution time, not
/// the service date.
pub fn build_rows(
    records: &[BillableRecord],
    batch_id: Uuid,
    executed_at: DateTime<Utc>,
    memos: &HashMap<Uuid, Option<String>>,
) -> Vec<InvoiceRow> {
    let invoice_date = executed_at.date_naive();
    let due_date = invoice_date
        .checked_add_days(Days::new(DUE_DAYS))
        .expect("due date within chrono range");

    let mut rows = Vec::with_capacity(records.len() * 2);
    for record in records {
        let invoice_number = invoice_number(batch_id, record.organization_id);
        let memo = memos.get(&record.organization_id).cloned().flatten();
        let quantity = i64::from(record.quantity);

        rows.push(InvoiceRow {
            invoice_number: invoice_number.clone(),
            customer: record.organization_qbo_name.clone(),
            invoice_date,
            due_date,
            terms: PAYMENT_TERMS,
            product: record.service_qbo_item_name.clone(),
            quantity: record.quantity,
            rate_cents: record.service_rate_cents,
            amount_cents: record.service_rate_cents * quantity,
            memo: memo.clone(),
            organization: record.organization_name.clone(),
            service_date: record.service_date.date_naive(),
            applicant: record.applicant_name.clone(),
            billing_number: record.billing_number.clone(),
            technician: record.technician_name.clone(),
        });

        if record.fee_amount_cents != 0 {
            rows.push(InvoiceRow {
                invoice_number,
                customer: record.organization_qbo_name.clone(),
                invoice_date,
                due_date,
                terms: PAYMENT_TERMS,
                product: FEE_PRODUCT.to_string(),
                quantity: record.quantity,
                rate_cents: record.fee_amount_cents,
                amount_cents: record.fee_amount_cents * quantity,
                memo,
                organization: record.organization_name.clone(),
                service_date: record.service_date.date_naive(),
                applicant: record.applicant_name.clone(),
                billing_number: record.billing_number.clone(),
                technician: record.technician_name.clone(),
            });
        }
    }

    rows
}
