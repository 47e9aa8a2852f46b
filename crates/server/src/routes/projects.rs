use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service::projects::domain::{NewProject, Permission, Project, ProjectMember, ProjectUpdate};
use tracing::info;
use utoipa::ToSchema;

use super::identity::{self, UserBody, UserQuery};
use super::MessageResponse;
use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to `active`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub owner_id: String,
}

impl From<CreateProjectRequest> for NewProject {
    fn from(r: CreateProjectRequest) -> Self {
        NewProject {
            title: r.title,
            description: r.description,
            status: r.status,
            owner_id: r.owner_id,
            company_id: r.company_id,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Used when `X-User-ID` is absent.
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddProjectMemberRequest {
    pub user_id: String,
    pub role: String,
    /// Any of `update`, `manage_members`, `admin`.
    pub permissions: Vec<String>,
    /// Used when `X-User-ID` is absent.
    pub requesting_user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub owner_id: String,
    pub company_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            status: p.status,
            owner_id: p.owner_id,
            company_id: p.company_id,
            start_date: p.start_date,
            end_date: p.end_date,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMemberResponse {
    pub id: i32,
    pub project_id: String,
    pub project_type: String,
    pub user_id: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub joined_at: DateTime<Utc>,
}

impl From<ProjectMember> for ProjectMemberResponse {
    fn from(m: ProjectMember) -> Self {
        Self {
            id: m.id,
            project_id: m.project_id,
            project_type: m.project_type,
            user_id: m.user_id,
            role: m.role,
            permissions: m.permissions.iter().map(Permission::as_str).map(str::to_string).collect(),
            joined_at: m.joined_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectMemberListResponse {
    pub members: Vec<ProjectMemberResponse>,
    pub total: usize,
}

#[utoipa::path(
    post, path = "/api/internal/projects", tag = "projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Created", body = ProjectResponse),
        (status = 400, description = "Invalid Input"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_project(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProjectResponse>), JsonApiError> {
    let req: CreateProjectRequest = identity::json_body(&body)?;
    let project = state.projects.create_project(req.into()).await?;
    info!(project_id = project.id, "create project ok");
    Ok((StatusCode::CREATED, Json(project.into())))
}

#[utoipa::path(
    get, path = "/api/internal/projects", tag = "projects",
    params(UserQuery, ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Owned and member projects", body = ProjectListResponse),
        (status = 400, description = "User ID required")
    )
)]
pub async fn list_projects(
    State(state): State<ServerState>,
    Query(q): Query<UserQuery>,
    headers: HeaderMap,
) -> Result<Json<ProjectListResponse>, JsonApiError> {
    let user_id = identity::listing_user(q, &headers)?;
    let projects: Vec<ProjectResponse> = state.projects.get_user_projects(&user_id).await?.into_iter().map(Into::into).collect();
    Ok(Json(ProjectListResponse { total: projects.len(), projects }))
}

#[utoipa::path(
    get, path = "/api/internal/projects/{id}", tag = "projects",
    params(("id" = i32, Path, description = "Project id"), ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_project(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProjectResponse>, JsonApiError> {
    let id = identity::project_id(&id)?;
    let fallback: UserBody = identity::optional_body(&body);
    let user_id = identity::acting_user(&headers, fallback.user_id, "User ID required")?;
    let project = state.projects.get_project(id, &user_id).await?;
    Ok(Json(project.into()))
}

#[utoipa::path(
    put, path = "/api/internal/projects/{id}", tag = "projects",
    params(("id" = i32, Path, description = "Project id"), ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated", body = ProjectResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_project(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProjectResponse>, JsonApiError> {
    let id = identity::project_id(&id)?;
    let req: UpdateProjectRequest = if body.is_empty() { UpdateProjectRequest::default() } else { identity::json_body(&body)? };
    let user_id = identity::acting_user(&headers, req.user_id, "User ID required")?;
    let update = ProjectUpdate {
        title: req.title,
        description: req.description,
        status: req.status,
        start_date: req.start_date,
        end_date: req.end_date,
    };
    let project = state.projects.update_project(id, update, &user_id).await?;
    Ok(Json(project.into()))
}

#[utoipa::path(
    delete, path = "/api/internal/projects/{id}", tag = "projects",
    params(("id" = i32, Path, description = "Project id"), ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_project(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = identity::project_id(&id)?;
    let fallback: UserBody = identity::optional_body(&body);
    let user_id = identity::acting_user(&headers, fallback.user_id, "User ID required")?;
    state.projects.delete_project(id, &user_id).await?;
    Ok(Json(MessageResponse::new("Project deleted successfully")))
}

#[utoipa::path(
    get, path = "/api/internal/projects/{id}/members", tag = "projects",
    params(("id" = i32, Path, description = "Project id"), UserQuery, ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Members", body = ProjectMemberListResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn list_project_members(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(q): Query<UserQuery>,
    headers: HeaderMap,
) -> Result<Json<ProjectMemberListResponse>, JsonApiError> {
    let id = identity::project_id(&id)?;
    let user_id = identity::listing_user(q, &headers)?;
    let members: Vec<ProjectMemberResponse> =
        state.projects.get_project_members(id, &user_id).await?.into_iter().map(Into::into).collect();
    Ok(Json(ProjectMemberListResponse { total: members.len(), members }))
}

#[utoipa::path(
    post, path = "/api/internal/projects/{id}/members", tag = "projects",
    params(("id" = i32, Path, description = "Project id"), ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    request_body = AddProjectMemberRequest,
    responses(
        (status = 201, description = "Member added", body = ProjectMemberResponse),
        (status = 400, description = "Invalid Input"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Already a member")
    )
)]
pub async fn add_project_member(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ProjectMemberResponse>), JsonApiError> {
    let id = identity::project_id(&id)?;
    let req: AddProjectMemberRequest = identity::json_body(&body)?;
    let requesting = identity::acting_user(&headers, req.requesting_user_id, "Requesting User ID required")?;
    let member = state
        .projects
        .add_project_member(id, &req.user_id, &req.role, &req.permissions, &requesting)
        .await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}
