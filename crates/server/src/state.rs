use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::companies::{repo::seaorm::SeaOrmCompanyRepository, repository::CompanyRepository, CompanyService};
use service::projects::{repo::seaorm::SeaOrmProjectRepository, repository::ProjectRepository, ProjectService};

pub type SharedProjectService = ProjectService<dyn ProjectRepository, dyn CompanyRepository>;
pub type SharedCompanyService = CompanyService<dyn CompanyRepository>;

/// Handler state: one service per domain over injected repositories.
#[derive(Clone)]
pub struct ServerState {
    pub projects: Arc<SharedProjectService>,
    pub companies: Arc<SharedCompanyService>,
}

impl ServerState {
    pub fn new(projects: Arc<dyn ProjectRepository>, companies: Arc<dyn CompanyRepository>) -> Self {
        Self {
            projects: Arc::new(ProjectService::new(projects, Arc::clone(&companies))),
            companies: Arc::new(CompanyService::new(companies)),
        }
    }

    pub fn from_db(db: DatabaseConnection) -> Self {
        Self::new(
            Arc::new(SeaOrmProjectRepository::new(db.clone())),
            Arc::new(SeaOrmCompanyRepository::new(db)),
        )
    }
}
