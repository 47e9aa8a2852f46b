use async_trait::async_trait;

use super::domain::{Company, CompanyMember, NewCompanyMember};
use crate::errors::ServiceError;

/// Persistence for companies and their member rows.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert the company and its owner row atomically; `Conflict` on a taken id.
    async fn create_company(&self, company: &Company, owner: &NewCompanyMember) -> Result<Company, ServiceError>;
    async fn find_company(&self, id: &str) -> Result<Option<Company>, ServiceError>;
    async fn update_company(&self, company: &Company) -> Result<Company, ServiceError>;
    /// Remove the company's member rows and then the company, atomically.
    async fn delete_company(&self, id: &str) -> Result<(), ServiceError>;

    async fn find_company_member(&self, company_id: &str, user_id: &str) -> Result<Option<CompanyMember>, ServiceError>;
    async fn list_company_members(&self, company_id: &str) -> Result<Vec<CompanyMember>, ServiceError>;
    async fn list_active_memberships(&self, user_id: &str) -> Result<Vec<CompanyMember>, ServiceError>;
    /// `Conflict` when the user already has a row for the company.
    async fn add_company_member(&self, member: &NewCompanyMember) -> Result<CompanyMember, ServiceError>;
    async fn remove_company_member(&self, company_id: &str, user_id: &str) -> Result<(), ServiceError>;
}
