use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRecords::Table)
                    .if_not_exists()
                    .col(pk_uuid(ServiceRecords::Id))
                    .col(timestamp_with_time_zone(ServiceRecords::ServiceDate))
                    // Organization reference + snapshots
                    .col(uuid(ServiceRecords::OrganizationId))
                    .col(string(ServiceRecords::OrganizationName))
                    .col(string(ServiceRecords::OrganizationQboName))
                    // Applicant
                    .col(string(ServiceRecords::ApplicantName))
                    .col(string(ServiceRecords::BillingNumber))
                    // Service reference + snapshots
                    .col(uuid(ServiceRecords::ServiceId))
                    .col(string(ServiceRecords::ServiceName))
                    .col(string(ServiceRecords::ServiceQboItemName))
                    .col(big_integer(ServiceRecords::ServiceRateCents))
                    // DOJ/FBI fee reference + snapshots
                    .col(uuid(ServiceRecords::FeeId))
                    .col(string(ServiceRecords::FeeLabel))
                    .col(big_integer(ServiceRecords::FeeAmountCents))
                    .col(integer(ServiceRecords::Quantity).default(1))
                    // Technician reference + snapshot
                    .col(uuid(ServiceRecords::TechnicianId))
                    .col(string(ServiceRecords::TechnicianName))
                    // Meta
                    .col(uuid(ServiceRecords::EnteredBy))
                    .col(boolean(ServiceRecords::Billed).default(false))
                    .col(timestamp_with_time_zone_null(ServiceRecords::BilledAt))
                    .col(uuid_null(ServiceRecords::ExportBatchId))
                    .col(
                        timestamp_with_time_zone(ServiceRecords::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ServiceRecords::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_records_organization_id")
                            .from(ServiceRecords::Table, ServiceRecords::OrganizationId)
                            .to(Organizations::Table, Organizations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_records_service_id")
                            .from(ServiceRecords::Table, ServiceRecords::ServiceId)
                            .to(Services::Table, Services::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_records_fee_id")
                            .from(ServiceRecords::Table, ServiceRecords::FeeId)
                            .to(Fees::Table, Fees::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_records_technician_id")
                            .from(ServiceRecords::Table, ServiceRecords::TechnicianId)
                            .to(Technicians::Table, Technicians::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_records_entered_by")
                            .from(ServiceRecords::Table, ServiceRecords::EnteredBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The export engine's candidate query filters on (billed, service_date, organization_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_service_records_billed_service_date")
                    .table(ServiceRecords::Table)
                    .col(ServiceRecords::Billed)
                    .col(ServiceRecords::ServiceDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_records_organization_id")
                    .table(ServiceRecords::Table)
                    .col(ServiceRecords::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_records_entered_by")
                    .table(ServiceRecords::Table)
                    .col(ServiceRecords::EnteredBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_records_export_batch_id")
                    .table(ServiceRecords::Table)
                    .col(ServiceRecords::ExportBatchId)
                    .to_owned(),
            )
            .await?;

        // Billing numbers are exactly six digits
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE service_records
                    ADD CONSTRAINT chk_service_records_billing_number
                    CHECK (billing_number ~ '^[0-9]{6}$')
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE service_records
                    ADD CONSTRAINT chk_service_records_quantity
                    CHECK (quantity >= 1)
                "#,
            )
            .await?;

        // Add updated_at trigger
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER service_records_touch_updated_at
                    BEFORE UPDATE ON service_records
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DROP TRIGGER IF EXISTS service_records_touch_updated_at ON service_records",
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ServiceRecords::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ServiceRecords {
    Table,
    Id,
    ServiceDate,
    OrganizationId,
    OrganizationName,
    OrganizationQboName,
    ApplicantName,
    BillingNumber,
    ServiceId,
    ServiceName,
    ServiceQboItemName,
    ServiceRateCents,
    FeeId,
    FeeLabel,
    FeeAmountCents,
    Quantity,
    TechnicianId,
    TechnicianName,
    EnteredBy,
    Billed,
    BilledAt,
    ExportBatchId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Fees {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Technicians {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
