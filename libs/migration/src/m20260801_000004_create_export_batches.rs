use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create export_format enum
        manager
            .create_type(
                Type::create()
                    .as_enum(ExportFormat::Enum)
                    .values([ExportFormat::Csv, ExportFormat::Xlsx])
                    .to_owned(),
            )
            .await?;

        // Create export_status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(ExportStatus::Enum)
                    .values([
                        ExportStatus::Pending,
                        ExportStatus::Committed,
                        ExportStatus::Uploaded,
                        ExportStatus::Failed,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExportBatches::Table)
                    .if_not_exists()
                    .col(pk_uuid(ExportBatches::Id))
                    .col(timestamp_with_time_zone(ExportBatches::StartDate))
                    .col(timestamp_with_time_zone(ExportBatches::EndDate))
                    .col(
                        ColumnDef::new(ExportBatches::Format)
                            .enumeration(ExportFormat::Enum, [ExportFormat::Csv, ExportFormat::Xlsx])
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExportBatches::Status)
                            .enumeration(
                                ExportStatus::Enum,
                                [
                                    ExportStatus::Pending,
                                    ExportStatus::Committed,
                                    ExportStatus::Uploaded,
                                    ExportStatus::Failed,
                                ],
                            )
                            .not_null()
                            .default("pending"),
                    )
                    .col(integer(ExportBatches::RecordCount))
                    .col(uuid(ExportBatches::ExportedBy))
                    .col(boolean(ExportBatches::SelectAllOrganizations).default(true))
                    .col(json_binary(ExportBatches::OrganizationIds))
                    .col(string_null(ExportBatches::FileKey))
                    .col(
                        timestamp_with_time_zone(ExportBatches::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_export_batches_exported_by")
                            .from(ExportBatches::Table, ExportBatches::ExportedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // History is listed newest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_export_batches_created_at")
                    .table(ExportBatches::Table)
                    .col(ExportBatches::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExportBatches::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ExportStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ExportFormat::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ExportBatches {
    Table,
    Id,
    StartDate,
    EndDate,
    Format,
    Status,
    RecordCount,
    ExportedBy,
    SelectAllOrganizations,
    OrganizationIds,
    FileKey,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ExportFormat {
    #[sea_orm(iden = "export_format")]
    Enum,
    #[sea_orm(iden = "csv")]
    Csv,
    #[sea_orm(iden = "xlsx")]
    Xlsx,
}

#[derive(DeriveIden)]
enum ExportStatus {
    #[sea_orm(iden = "export_status")]
    Enum,
    #[sea_orm(iden = "pending")]
    Pending,
    #[sea_orm(iden = "committed")]
    Committed,
    #[sea_orm(iden = "uploaded")]
    Uploaded,
    #[sea_orm(iden = "failed")]
    Failed,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
