//! Lookup seams resolved by the api crate.

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ExportResult;

/// Organization-level invoice data that is not snapshotted on records.
///
/// The invoice memo is deliberately live: admins expect a memo edit to show up
/// on the next export, unlike the frozen name/QBO snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// Invoice memos for the given organizations, keyed by id. Organizations
    /// without a memo may be absent from the map.
    async fn invoice_memos(&self, ids: Vec<Uuid>)
        -> ExportResult<HashMap<Uuid, Option<String>>>;
}

/// Resolves exporter user ids to emails for the history view
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExporterDirectory: Send + Sync {
    /// Emails for the given user ids; unknown ids may be absent from the map
    async fn emails(&self, ids: Vec<Uuid>) -> ExportResult<HashMap<Uuid, String>>;
}
