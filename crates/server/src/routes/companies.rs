use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service::companies::domain::{Company, CompanyMember, CompanyUpdate, Compensation};
use tracing::info;
use utoipa::ToSchema;

use super::identity::{self, RequestingUserBody, UserBody, UserQuery};
use super::MessageResponse;
use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: String,
    pub owner_id: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub company_type: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddCompanyMemberRequest {
    pub user_id: String,
    pub role: String,
    pub salary: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub requesting_user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: String,
    pub owner_id: String,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        Self { id: c.id, name: c.name, company_type: c.company_type, owner_id: c.owner_id }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMemberResponse {
    pub id: i32,
    pub company_id: String,
    pub user_id: String,
    pub role: String,
    pub status: String,
    pub joined_at: Option<DateTime<Utc>>,
    pub invited_at: DateTime<Utc>,
    pub invited_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

impl From<CompanyMember> for CompanyMemberResponse {
    fn from(m: CompanyMember) -> Self {
        Self {
            id: m.id,
            company_id: m.company_id,
            user_id: m.user_id,
            role: m.role,
            status: m.status.as_str().to_string(),
            joined_at: m.joined_at,
            invited_at: m.invited_at,
            invited_by: m.invited_by,
            salary: m.salary,
            hourly_rate: m.hourly_rate,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanyResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyMemberListResponse {
    pub members: Vec<CompanyMemberResponse>,
    pub total: usize,
}

#[utoipa::path(
    post, path = "/api/internal/companies", tag = "companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Created with owner membership", body = CompanyResponse),
        (status = 400, description = "Invalid Input"),
        (status = 409, description = "Company id taken")
    )
)]
pub async fn create_company(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CompanyResponse>), JsonApiError> {
    let req: CreateCompanyRequest = identity::json_body(&body)?;
    let company = Company { id: req.id, name: req.name, company_type: req.company_type, owner_id: req.owner_id };
    let created = state.companies.create_company(company).await?;
    info!(company_id = %created.id, "create company ok");
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get, path = "/api/internal/companies", tag = "companies",
    params(UserQuery, ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Companies with an active membership", body = CompanyListResponse),
        (status = 400, description = "User ID required")
    )
)]
pub async fn list_companies(
    State(state): State<ServerState>,
    Query(q): Query<UserQuery>,
    headers: HeaderMap,
) -> Result<Json<CompanyListResponse>, JsonApiError> {
    let user_id = identity::listing_user(q, &headers)?;
    let companies: Vec<CompanyResponse> =
        state.companies.get_user_companies(&user_id).await?.into_iter().map(Into::into).collect();
    Ok(Json(CompanyListResponse { total: companies.len(), companies }))
}

#[utoipa::path(
    get, path = "/api/internal/companies/{id}", tag = "companies",
    params(("id" = String, Path, description = "Company id"), ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Company", body = CompanyResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_company(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CompanyResponse>, JsonApiError> {
    let fallback: UserBody = identity::optional_body(&body);
    let user_id = identity::acting_user(&headers, fallback.user_id, "User ID required")?;
    let company = state.companies.get_company(&id, &user_id).await?;
    Ok(Json(company.into()))
}

#[utoipa::path(
    put, path = "/api/internal/companies/{id}", tag = "companies",
    params(("id" = String, Path, description = "Company id"), ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Updated", body = CompanyResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_company(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CompanyResponse>, JsonApiError> {
    let req: UpdateCompanyRequest = if body.is_empty() { UpdateCompanyRequest::default() } else { identity::json_body(&body)? };
    let user_id = identity::acting_user(&headers, req.user_id, "User ID required")?;
    let update = CompanyUpdate { name: req.name, company_type: req.company_type };
    let company = state.companies.update_company(&id, update, &user_id).await?;
    Ok(Json(company.into()))
}

#[utoipa::path(
    delete, path = "/api/internal/companies/{id}", tag = "companies",
    params(("id" = String, Path, description = "Company id"), ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Deleted with its members", body = MessageResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_company(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let fallback: UserBody = identity::optional_body(&body);
    let user_id = identity::acting_user(&headers, fallback.user_id, "User ID required")?;
    state.companies.delete_company(&id, &user_id).await?;
    Ok(Json(MessageResponse::new("Company deleted successfully")))
}

#[utoipa::path(
    get, path = "/api/internal/companies/{id}/members", tag = "companies",
    params(("id" = String, Path, description = "Company id"), UserQuery, ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Members", body = CompanyMemberListResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn list_company_members(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(q): Query<UserQuery>,
    headers: HeaderMap,
) -> Result<Json<CompanyMemberListResponse>, JsonApiError> {
    let user_id = identity::listing_user(q, &headers)?;
    let members: Vec<CompanyMemberResponse> =
        state.companies.get_company_members(&id, &user_id).await?.into_iter().map(Into::into).collect();
    Ok(Json(CompanyMemberListResponse { total: members.len(), members }))
}

#[utoipa::path(
    post, path = "/api/internal/companies/{id}/members", tag = "companies",
    params(("id" = String, Path, description = "Company id"), ("X-User-ID" = Option<String>, Header, description = "Acting user")),
    request_body = AddCompanyMemberRequest,
    responses(
        (status = 201, description = "Member added", body = CompanyMemberResponse),
        (status = 400, description = "Invalid Input"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Already a member")
    )
)]
pub async fn add_company_member(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<CompanyMemberResponse>), JsonApiError> {
    let req: AddCompanyMemberRequest = identity::json_body(&body)?;
    let requesting = identity::acting_user(&headers, req.requesting_user_id, "Requesting User ID required")?;
    let pay = Compensation { salary: req.salary, hourly_rate: req.hourly_rate };
    let member = state.companies.add_company_member(&id, &req.user_id, &req.role, pay, &requesting).await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

#[utoipa::path(
    delete, path = "/api/internal/companies/{id}/members/{userId}", tag = "companies",
    params(
        ("id" = String, Path, description = "Company id"),
        ("userId" = String, Path, description = "Member to remove"),
        ("X-User-ID" = Option<String>, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Removed", body = MessageResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn remove_company_member(
    State(state): State<ServerState>,
    Path((id, user_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let fallback: RequestingUserBody = identity::optional_body(&body);
    let requesting = identity::acting_user(&headers, fallback.requesting_user_id, "Requesting User ID required")?;
    state.companies.remove_company_member(&id, &user_id, &requesting).await?;
    Ok(Json(MessageResponse::new("Member removed successfully")))
}
