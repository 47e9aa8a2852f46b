use chrono::{DateTime, Utc};
use models::{project, project_member};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, Unchanged};

use crate::errors::ServiceError;
use crate::projects::domain::{NewProject, NewProjectMember, Permission, Project, ProjectMember};
use crate::projects::repository::ProjectRepository;

pub struct SeaOrmProjectRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_project(m: project::Model) -> Project {
    Project {
        id: m.id,
        title: m.title,
        description: m.description,
        status: m.status,
        owner_id: m.owner_id,
        company_id: m.company_id,
        start_date: m.start_date.map(|d| d.with_timezone(&Utc)),
        end_date: m.end_date.map(|d| d.with_timezone(&Utc)),
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn to_member(m: project_member::Model) -> ProjectMember {
    let tokens = project_member::decode_permissions(&m.permissions);
    ProjectMember {
        id: m.id,
        project_id: m.project_id,
        project_type: m.project_type,
        user_id: m.user_id,
        role: m.role,
        permissions: Permission::from_stored(&tokens),
        joined_at: m.joined_at.with_timezone(&Utc),
    }
}

#[async_trait::async_trait]
impl ProjectRepository for SeaOrmProjectRepository {
    async fn create_project(&self, input: &NewProject, now: DateTime<Utc>) -> Result<Project, ServiceError> {
        let am = project::ActiveModel {
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            status: Set(project::status_or_default(&input.status)),
            owner_id: Set(input.owner_id.clone()),
            company_id: Set(input.company_id.clone()),
            start_date: Set(input.start_date.map(Into::into)),
            end_date: Set(input.end_date.map(Into::into)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let created = am.insert(&self.db).await?;
        Ok(to_project(created))
    }

    async fn find_project(&self, id: i32) -> Result<Option<Project>, ServiceError> {
        let res = project::Entity::find_by_id(id).one(&self.db).await?;
        Ok(res.map(to_project))
    }

    async fn update_project(&self, p: &Project) -> Result<Project, ServiceError> {
        let am = project::ActiveModel {
            id: Unchanged(p.id),
            title: Set(p.title.clone()),
            description: Set(p.description.clone()),
            status: Set(p.status.clone()),
            owner_id: Set(p.owner_id.clone()),
            company_id: Set(p.company_id.clone()),
            start_date: Set(p.start_date.map(Into::into)),
            end_date: Set(p.end_date.map(Into::into)),
            created_at: Set(p.created_at.into()),
            updated_at: Set(p.updated_at.into()),
        };
        match am.update(&self.db).await {
            Ok(m) => Ok(to_project(m)),
            Err(DbErr::RecordNotUpdated) => Err(ServiceError::not_found("project")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_project(&self, id: i32) -> Result<(), ServiceError> {
        project::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn list_owned_projects(&self, user_id: &str) -> Result<Vec<Project>, ServiceError> {
        let rows = project::Entity::find()
            .filter(project::Column::OwnerId.eq(user_id))
            .order_by_asc(project::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_project).collect())
    }

    async fn find_project_member(&self, project_id: i32, user_id: &str) -> Result<Option<ProjectMember>, ServiceError> {
        let res = project_member::Entity::find()
            .filter(project_member::Column::ProjectId.eq(project_id.to_string()))
            .filter(project_member::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(res.map(to_member))
    }

    async fn list_project_members(&self, project_id: i32) -> Result<Vec<ProjectMember>, ServiceError> {
        let rows = project_member::Entity::find()
            .filter(project_member::Column::ProjectId.eq(project_id.to_string()))
            .order_by_asc(project_member::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_member).collect())
    }

    async fn list_user_memberships(&self, user_id: &str) -> Result<Vec<ProjectMember>, ServiceError> {
        let rows = project_member::Entity::find()
            .filter(project_member::Column::UserId.eq(user_id))
            .order_by_asc(project_member::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_member).collect())
    }

    async fn add_project_member(&self, member: &NewProjectMember) -> Result<ProjectMember, ServiceError> {
        let tokens: Vec<&str> = member.permissions.iter().map(Permission::as_str).collect();
        let am = project_member::ActiveModel {
            project_id: Set(member.project_id.to_string()),
            project_type: Set(project_member::CORE_PROJECT_TYPE.to_string()),
            user_id: Set(member.user_id.clone()),
            role: Set(member.role.clone()),
            permissions: Set(project_member::encode_permissions(&tokens)?),
            joined_at: Set(member.joined_at.into()),
            ..Default::default()
        };
        let created = am
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::from_db_conflict(e, "user is already a member of this project"))?;
        Ok(to_member(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_project, sqlite_db};
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    #[tokio::test]
    async fn project_rows_round_trip() -> Result<(), anyhow::Error> {
        let repo = SeaOrmProjectRepository::new(sqlite_db().await?);
        let now = Utc::now();
        let mut input = new_project("owner", "Roadmap", None);
        input.description = Some("Q3 plan".into());
        let created = repo.create_project(&input, now).await?;
        assert!(created.id > 0);
        assert_eq!(created.status, "active");

        let mut found = repo.find_project(created.id).await?.expect("project");
        assert_eq!(found.description.as_deref(), Some("Q3 plan"));

        found.title = "Roadmap v2".into();
        found.description = None;
        let updated = repo.update_project(&found).await?;
        assert_eq!(updated.title, "Roadmap v2");
        assert!(updated.description.is_none());

        assert_eq!(repo.list_owned_projects("owner").await?.len(), 1);
        repo.delete_project(created.id).await?;
        assert!(repo.find_project(created.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_member_is_conflict() -> Result<(), anyhow::Error> {
        let repo = SeaOrmProjectRepository::new(sqlite_db().await?);
        let p = repo.create_project(&new_project("owner", "Roadmap", None), Utc::now()).await?;
        let member = NewProjectMember {
            project_id: p.id,
            user_id: "bob".into(),
            role: "editor".into(),
            permissions: vec![Permission::Update, Permission::ManageMembers],
            joined_at: Utc::now(),
        };
        let added = repo.add_project_member(&member).await?;
        assert_eq!(added.project_id, p.id.to_string());
        assert_eq!(added.project_type, "core");
        assert_eq!(added.permissions, vec![Permission::Update, Permission::ManageMembers]);

        let err = repo.add_project_member(&member).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(repo.list_project_members(p.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_stored_permissions_are_dropped() -> Result<(), anyhow::Error> {
        let db = sqlite_db().await?;
        db.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "INSERT INTO project_member (project_id, project_type, user_id, role, permissions, joined_at) \
             VALUES ('legacy-1', 'core', 'bob', 'viewer', '[\"delete\",\"update\"]', '2024-01-01T00:00:00+00:00')"
                .to_string(),
        ))
        .await?;
        let repo = SeaOrmProjectRepository::new(db);
        let rows = repo.list_user_memberships("bob").await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].project_id, "legacy-1");
        assert_eq!(rows[0].permissions, vec![Permission::Update]);
        Ok(())
    }
}
