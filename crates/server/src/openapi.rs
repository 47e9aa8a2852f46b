use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::routes::{companies, projects, MessageResponse};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        projects::create_project,
        projects::list_projects,
        projects::get_project,
        projects::update_project,
        projects::delete_project,
        projects::list_project_members,
        projects::add_project_member,
        companies::create_company,
        companies::list_companies,
        companies::get_company,
        companies::update_company,
        companies::delete_company,
        companies::list_company_members,
        companies::add_company_member,
        companies::remove_company_member,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            projects::CreateProjectRequest,
            projects::UpdateProjectRequest,
            projects::AddProjectMemberRequest,
            projects::ProjectResponse,
            projects::ProjectMemberResponse,
            projects::ProjectListResponse,
            projects::ProjectMemberListResponse,
            companies::CreateCompanyRequest,
            companies::UpdateCompanyRequest,
            companies::AddCompanyMemberRequest,
            companies::CompanyResponse,
            companies::CompanyMemberResponse,
            companies::CompanyListResponse,
            companies::CompanyMemberListResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "projects"),
        (name = "companies")
    )
)]
pub struct ApiDoc;
