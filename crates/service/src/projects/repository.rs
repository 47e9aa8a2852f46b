use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{NewProject, NewProjectMember, Project, ProjectMember};
use crate::errors::ServiceError;

/// Persistence for projects and their member rows.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, input: &NewProject, now: DateTime<Utc>) -> Result<Project, ServiceError>;
    async fn find_project(&self, id: i32) -> Result<Option<Project>, ServiceError>;
    /// Overwrite every mutable column with `project`'s values.
    async fn update_project(&self, project: &Project) -> Result<Project, ServiceError>;
    async fn delete_project(&self, id: i32) -> Result<(), ServiceError>;
    async fn list_owned_projects(&self, user_id: &str) -> Result<Vec<Project>, ServiceError>;

    async fn find_project_member(&self, project_id: i32, user_id: &str) -> Result<Option<ProjectMember>, ServiceError>;
    async fn list_project_members(&self, project_id: i32) -> Result<Vec<ProjectMember>, ServiceError>;
    /// Every membership row of `user_id`, whatever its project id looks like.
    async fn list_user_memberships(&self, user_id: &str) -> Result<Vec<ProjectMember>, ServiceError>;
    /// `Conflict` when the user already has a row for the project.
    async fn add_project_member(&self, member: &NewProjectMember) -> Result<ProjectMember, ServiceError>;
}
