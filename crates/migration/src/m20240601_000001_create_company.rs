//! Create `company` table.
//!
//! Identity is supplied by the caller, not generated.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(string_len(Company::Id, 128).primary_key())
                    .col(string_len(Company::Name, 255).not_null())
                    .col(string_len(Company::CompanyType, 64).not_null())
                    .col(string_len(Company::OwnerId, 128).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Company::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Company { Table, Id, Name, CompanyType, OwnerId }
