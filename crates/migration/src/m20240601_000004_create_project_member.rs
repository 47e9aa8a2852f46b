//! Create `project_member` table.
//!
//! `project_id` is stored as text and carries no FK, so rows survive
//! project deletion.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectMember::Table)
                    .if_not_exists()
                    .col(pk_auto(ProjectMember::Id))
                    .col(string_len(ProjectMember::ProjectId, 64).not_null())
                    .col(string_len(ProjectMember::ProjectType, 32).not_null())
                    .col(string_len(ProjectMember::UserId, 128).not_null())
                    .col(string_len(ProjectMember::Role, 64).not_null())
                    .col(text(ProjectMember::Permissions).not_null())
                    .col(timestamp_with_time_zone(ProjectMember::JoinedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_project_member_project_user")
                    .table(ProjectMember::Table)
                    .col(ProjectMember::ProjectId)
                    .col(ProjectMember::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProjectMember::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProjectMember {
    Table,
    Id,
    ProjectId,
    ProjectType,
    UserId,
    Role,
    Permissions,
    JoinedAt,
}
