use axum::{
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::{OpenApi, ToSchema};

use common::types::{Health, ServiceInfo};

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod companies;
pub mod identity;
pub mod projects;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self { Self { message: message.to_string() } }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::healthy())
}

const ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /api-docs/openapi.json",
    "POST /api/internal/projects",
    "GET /api/internal/projects",
    "GET /api/internal/projects/:id",
    "PUT /api/internal/projects/:id",
    "DELETE /api/internal/projects/:id",
    "GET /api/internal/projects/:id/members",
    "POST /api/internal/projects/:id/members",
    "POST /api/internal/companies",
    "GET /api/internal/companies",
    "GET /api/internal/companies/:id",
    "PUT /api/internal/companies/:id",
    "DELETE /api/internal/companies/:id",
    "GET /api/internal/companies/:id/members",
    "POST /api/internal/companies/:id/members",
    "DELETE /api/internal/companies/:id/members/:userId",
];

pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: common::SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn internal_routes() -> Router<ServerState> {
    Router::new()
        .route("/projects", get(projects::list_projects).post(projects::create_project))
        .route(
            "/projects/:id",
            get(projects::get_project).put(projects::update_project).delete(projects::delete_project),
        )
        .route(
            "/projects/:id/members",
            get(projects::list_project_members).post(projects::add_project_member),
        )
        .route("/companies", get(companies::list_companies).post(companies::create_company))
        .route(
            "/companies/:id",
            get(companies::get_company).put(companies::update_company).delete(companies::delete_company),
        )
        .route(
            "/companies/:id/members",
            get(companies::list_company_members).post(companies::add_company_member),
        )
        .route("/companies/:id/members/:user_id", delete(companies::remove_company_member))
}

/// Build the application router: public endpoints plus the internal API.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/internal", internal_routes())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and transport failures
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
