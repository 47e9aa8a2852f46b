use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use super::domain::{Company, CompanyMember, CompanyUpdate, Compensation, NewCompanyMember, ROLE_OWNER};
use super::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::policy;

/// Company business service.
pub struct CompanyService<R: CompanyRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CompanyRepository + ?Sized> CompanyService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a company together with its owner membership.
    ///
    /// # Examples
    /// ```
    /// use service::companies::{domain::Company, CompanyService};
    /// use service::mock::MockStore;
    /// use std::sync::Arc;
    /// let svc = CompanyService::new(Arc::new(MockStore::default()));
    /// let acme = Company { id: "acme".into(), name: "Acme".into(), company_type: "enterprise".into(), owner_id: "u1".into() };
    /// tokio_test::block_on(svc.create_company(acme)).unwrap();
    /// let members = tokio_test::block_on(svc.get_company_members("acme", "u1")).unwrap();
    /// assert_eq!(members.len(), 1);
    /// assert_eq!(members[0].role, "owner");
    /// ```
    #[instrument(skip(self, company), fields(company_id = %company.id, user_id = %company.owner_id))]
    pub async fn create_company(&self, company: Company) -> Result<Company, ServiceError> {
        models::company::validate_id(&company.id)?;
        models::company::validate_owner(&company.owner_id)?;
        models::company::validate_details(&company.name, &company.company_type)?;

        let owner = NewCompanyMember::active(
            &company.id,
            &company.owner_id,
            ROLE_OWNER,
            &company.owner_id,
            Utc::now(),
            Compensation::default(),
        );
        let created = self.repo.create_company(&company, &owner).await?;
        info!("company_created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_company(&self, id: &str, user_id: &str) -> Result<Company, ServiceError> {
        let company = self.load(id).await?;
        if !self.user_can_access_company(user_id, id).await {
            return Err(ServiceError::forbidden("access this company"));
        }
        Ok(company)
    }

    #[instrument(skip(self, update))]
    pub async fn update_company(&self, id: &str, update: CompanyUpdate, user_id: &str) -> Result<Company, ServiceError> {
        let mut company = self.load(id).await?;
        let member = self.member_of(id, user_id).await;
        if !policy::can_update_company(&company, user_id, member.as_ref()) {
            return Err(ServiceError::forbidden("update this company"));
        }
        update.apply(&mut company);
        models::company::validate_details(&company.name, &company.company_type)?;
        let saved = self.repo.update_company(&company).await?;
        info!("company_updated");
        Ok(saved)
    }

    /// Owner only; member rows go with the company.
    #[instrument(skip(self))]
    pub async fn delete_company(&self, id: &str, user_id: &str) -> Result<(), ServiceError> {
        let company = self.load(id).await?;
        if !policy::can_delete_company(&company, user_id) {
            return Err(ServiceError::forbidden("delete this company"));
        }
        self.repo.delete_company(id).await?;
        info!("company_deleted");
        Ok(())
    }

    /// Companies with an active membership for `user_id`. Lookups that miss
    /// or fail are left out of the result.
    #[instrument(skip(self))]
    pub async fn get_user_companies(&self, user_id: &str) -> Result<Vec<Company>, ServiceError> {
        let memberships = self.repo.list_active_memberships(user_id).await?;
        let mut companies = Vec::with_capacity(memberships.len());
        for m in memberships {
            match self.repo.find_company(&m.company_id).await {
                Ok(Some(c)) => companies.push(c),
                Ok(None) => {}
                Err(e) => warn!(company_id = %m.company_id, error = %e, "company lookup failed; skipping"),
            }
        }
        Ok(companies)
    }

    #[instrument(skip(self), fields(user_id = %requesting_user_id))]
    pub async fn get_company_members(&self, company_id: &str, requesting_user_id: &str) -> Result<Vec<CompanyMember>, ServiceError> {
        self.load(company_id).await?;
        if !self.user_can_access_company(requesting_user_id, company_id).await {
            return Err(ServiceError::forbidden("view members of this company"));
        }
        self.repo.list_company_members(company_id).await
    }

    /// Add an active member invited by `requesting_user_id`.
    #[instrument(skip(self, user_id, pay, requesting_user_id), fields(user_id = %requesting_user_id, member_id = %user_id))]
    pub async fn add_company_member(
        &self,
        company_id: &str,
        user_id: &str,
        role: &str,
        pay: Compensation,
        requesting_user_id: &str,
    ) -> Result<CompanyMember, ServiceError> {
        let company = self.load(company_id).await?;
        let requester = self.member_of(company_id, requesting_user_id).await;
        if !policy::can_manage_company_members(&company, requesting_user_id, requester.as_ref()) {
            return Err(ServiceError::forbidden("add members to this company"));
        }
        models::company_member::validate_member(user_id, role, requesting_user_id)?;

        let member = NewCompanyMember::active(company_id, user_id, role, requesting_user_id, Utc::now(), pay);
        let created = self.repo.add_company_member(&member).await?;
        info!(role = %created.role, "company_member_added");
        Ok(created)
    }

    /// Removing a user without a membership row succeeds and changes nothing.
    #[instrument(skip(self, user_id, requesting_user_id), fields(user_id = %requesting_user_id, member_id = %user_id))]
    pub async fn remove_company_member(&self, company_id: &str, user_id: &str, requesting_user_id: &str) -> Result<(), ServiceError> {
        let company = self.load(company_id).await?;
        if company.owner_id == user_id {
            return Err(ServiceError::Forbidden("cannot remove company owner".into()));
        }
        let requester = self.member_of(company_id, requesting_user_id).await;
        if !policy::can_remove_company_member(&company, user_id, requesting_user_id, requester.as_ref()) {
            return Err(ServiceError::forbidden("remove members from this company"));
        }
        self.repo.remove_company_member(company_id, user_id).await?;
        info!("company_member_removed");
        Ok(())
    }

    pub async fn user_can_access_company(&self, user_id: &str, company_id: &str) -> bool {
        policy::can_access_company(self.member_of(company_id, user_id).await.as_ref())
    }

    async fn load(&self, id: &str) -> Result<Company, ServiceError> {
        self.repo.find_company(id).await?.ok_or_else(|| ServiceError::not_found("company"))
    }

    // Lookup failures count as "no membership".
    async fn member_of(&self, company_id: &str, user_id: &str) -> Option<CompanyMember> {
        match self.repo.find_company_member(company_id, user_id).await {
            Ok(member) => member,
            Err(e) => {
                warn!(company_id, user_id, error = %e, "company member lookup failed");
                None
            }
        }
    }
}
