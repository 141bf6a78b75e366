use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Organizations
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(pk_uuid(Organizations::Id))
                    .col(string(Organizations::Name))
                    .col(string(Organizations::QboCustomerName))
                    .col(text_null(Organizations::InvoiceMemo))
                    .col(boolean(Organizations::Active).default(true))
                    .col(boolean(Organizations::Suspended).default(false))
                    .col(
                        timestamp_with_time_zone(Organizations::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Organizations::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Duplicate organization names rejected case-insensitively
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_organizations_name ON organizations (LOWER(name))",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_organizations_qbo_customer_name ON organizations (LOWER(qbo_customer_name))",
            )
            .await?;

        // Services
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(pk_uuid(Services::Id))
                    .col(string(Services::Name))
                    .col(string(Services::QboItemName))
                    .col(big_integer(Services::RateCents))
                    .col(boolean(Services::Active).default(true))
                    .col(
                        timestamp_with_time_zone(Services::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Services::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("CREATE UNIQUE INDEX idx_services_name ON services (LOWER(name))")
            .await?;

        // Fees
        manager
            .create_table(
                Table::create()
                    .table(Fees::Table)
                    .if_not_exists()
                    .col(pk_uuid(Fees::Id))
                    .col(string(Fees::Label))
                    .col(big_integer(Fees::AmountCents))
                    .col(boolean(Fees::Active).default(true))
                    .col(
                        timestamp_with_time_zone(Fees::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Fees::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Technicians
        manager
            .create_table(
                Table::create()
                    .table(Technicians::Table)
                    .if_not_exists()
                    .col(pk_uuid(Technicians::Id))
                    .col(string(Technicians::Name))
                    .col(boolean(Technicians::Active).default(true))
                    .col(
                        timestamp_with_time_zone(Technicians::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Technicians::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Add updated_at triggers
        for table in ["organizations", "services", "fees", "technicians"] {
            manager
                .get_connection()
                .execute_unprepared(&format!(
                    r#"
                    CREATE TRIGGER {table}_touch_updated_at
                        BEFORE UPDATE ON {table}
                        FOR EACH ROW
                        EXECUTE FUNCTION util.touch_updated_at()
                    "#
                ))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in ["technicians", "fees", "services", "organizations"] {
            manager
                .get_connection()
                .execute_unprepared(&format!(
                    "DROP TRIGGER IF EXISTS {table}_touch_updated_at ON {table}"
                ))
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Technicians::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Name,
    QboCustomerName,
    InvoiceMemo,
    Active,
    Suspended,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    Name,
    QboItemName,
    RateCents,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Fees {
    Table,
    Id,
    Label,
    AmountCents,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Technicians {
    Table,
    Id,
    Name,
    Active,
    CreatedAt,
    UpdatedAt,
}
