//! Create `company_member` table with FK to `company`.
//!
//! One row per (company, user); the unique index is the duplicate-membership guard.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanyMember::Table)
                    .if_not_exists()
                    .col(pk_auto(CompanyMember::Id))
                    .col(string_len(CompanyMember::CompanyId, 128).not_null())
                    .col(string_len(CompanyMember::UserId, 128).not_null())
                    .col(string_len(CompanyMember::Role, 64).not_null())
                    .col(string_len(CompanyMember::Status, 32).not_null())
                    .col(timestamp_with_time_zone_null(CompanyMember::JoinedAt))
                    .col(timestamp_with_time_zone(CompanyMember::InvitedAt).not_null())
                    .col(string_len(CompanyMember::InvitedBy, 128).not_null())
                    .col(double_null(CompanyMember::Salary))
                    .col(double_null(CompanyMember::HourlyRate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_member_company")
                            .from(CompanyMember::Table, CompanyMember::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_company_member_company_user")
                    .table(CompanyMember::Table)
                    .col(CompanyMember::CompanyId)
                    .col(CompanyMember::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CompanyMember::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CompanyMember {
    Table,
    Id,
    CompanyId,
    UserId,
    Role,
    Status,
    JoinedAt,
    InvitedAt,
    InvitedBy,
    Salary,
    HourlyRate,
}

#[derive(DeriveIden)]
enum Company { Table, Id }
