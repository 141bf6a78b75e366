pub use sea_orm_migration::prelude::*;

mod m20260801_000000_bootstrap;
mod m20260801_000001_create_users;
mod m20260801_000002_create_catalog;
mod m20260801_000003_create_service_records;
mod m20260801_000004_create_export_batches;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000000_bootstrap::Migration),
            Box::new(m20260801_000001_create_users::Migration),
            Box::new(m20260801_000002_create_catalog::Migration),
            Box::new(m20260801_000003_create_service_records::Migration),
            Box::new(m20260801_000004_create_export_batches::Migration),
        ]
    }
}
