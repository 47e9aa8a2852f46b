//! Create `project` table.
//!
//! `company_id` has no FK; it is only consulted by access checks.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(pk_auto(Project::Id))
                    .col(string_len(Project::Title, 255).not_null())
                    .col(text_null(Project::Description))
                    .col(string_len(Project::Status, 32).not_null())
                    .col(string_len(Project::OwnerId, 128).not_null())
                    .col(string_len_null(Project::CompanyId, 128))
                    .col(timestamp_with_time_zone_null(Project::StartDate))
                    .col(timestamp_with_time_zone_null(Project::EndDate))
                    .col(timestamp_with_time_zone(Project::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Project::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Project::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
    Title,
    Description,
    Status,
    OwnerId,
    CompanyId,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}
