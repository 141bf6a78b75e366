//! Service Records Domain
//!
//! A service record is one billable live-scan transaction. At entry time the
//! referenced catalog rows (organization, service, fee, technician) are
//! validated through the [`ReferenceData`] seam and their display values are
//! snapshotted onto the record, so later catalog edits never rewrite history.
//!
//! Records stay editable while `billed = false`; the export engine flips them
//! to billed (via its own record-store seam) and from then on they are
//! immutable and permanent.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod reference;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{RecordError, RecordResult};
pub use handlers::{router, RecordsApiDoc};
pub use models::{
    CreateServiceRecord, ServiceRecord, StaffRecordStats, UnbilledStats, UpdateServiceRecord,
};
pub use postgres::PgServiceRecordRepository;
pub use reference::{FeeRef, OrganizationRef, ReferenceData, ServiceRef, TechnicianRef};
pub use repository::ServiceRecordRepository;
pub use service::RecordService;
