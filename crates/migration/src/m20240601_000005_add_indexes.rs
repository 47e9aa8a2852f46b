use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Project: owner lookups (GetUserProjects)
        manager
            .create_index(
                Index::create()
                    .name("idx_project_owner")
                    .table(Project::Table)
                    .col(Project::OwnerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_project_company")
                    .table(Project::Table)
                    .col(Project::CompanyId)
                    .to_owned(),
            )
            .await?;

        // Memberships by user
        manager
            .create_index(
                Index::create()
                    .name("idx_project_member_user")
                    .table(ProjectMember::Table)
                    .col(ProjectMember::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_company_member_user_status")
                    .table(CompanyMember::Table)
                    .col(CompanyMember::UserId)
                    .col(CompanyMember::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_project_owner").table(Project::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_project_company").table(Project::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_project_member_user").table(ProjectMember::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_company_member_user_status").table(CompanyMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Project { Table, OwnerId, CompanyId }

#[derive(DeriveIden)]
enum ProjectMember { Table, UserId }

#[derive(DeriveIden)]
enum CompanyMember { Table, UserId, Status }
