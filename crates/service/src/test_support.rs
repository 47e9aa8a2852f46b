use sea_orm::DatabaseConnection;

use crate::companies::domain::Company;
use crate::projects::domain::NewProject;

/// Fresh migrated in-memory database; every call is isolated.
pub async fn sqlite_db() -> anyhow::Result<DatabaseConnection> {
    models::db::connect_in_memory().await
}

pub fn new_project(owner: &str, title: &str, company_id: Option<&str>) -> NewProject {
    NewProject {
        title: title.to_string(),
        owner_id: owner.to_string(),
        company_id: company_id.map(str::to_string),
        ..Default::default()
    }
}

pub fn company(id: &str, owner: &str) -> Company {
    Company { id: id.to_string(), name: "Acme".into(), company_type: "enterprise".into(), owner_id: owner.to_string() }
}
