//! Catalog Domain
//!
//! Reference data managed by administrators: organizations, services, DOJ/FBI
//! fees, and technicians. Rows are never deleted, only toggled inactive (and,
//! for organizations, suspended). Service records snapshot catalog values at
//! entry time, so edits here never rewrite history.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use handlers::CatalogApiDoc;
pub use models::{
    CreateFee, CreateOrganization, CreateService, CreateTechnician, Fee, Organization, Service,
    Technician, UpdateFee, UpdateOrganization, UpdateService, UpdateTechnician,
};
pub use postgres::PgCatalogRepository;
pub use repository::CatalogRepository;
pub use service::CatalogService;
