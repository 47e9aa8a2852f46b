use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::domain::{NewProject, NewProjectMember, Permission, Project, ProjectMember, ProjectUpdate};
use super::repository::ProjectRepository;
use crate::companies::domain::CompanyMember;
use crate::companies::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::policy;

/// Project business service. Company membership is read through `companies`
/// for company-scoped projects.
pub struct ProjectService<P: ProjectRepository + ?Sized, C: CompanyRepository + ?Sized> {
    repo: Arc<P>,
    companies: Arc<C>,
}

impl<P: ProjectRepository + ?Sized, C: CompanyRepository + ?Sized> ProjectService<P, C> {
    pub fn new(repo: Arc<P>, companies: Arc<C>) -> Self { Self { repo, companies } }

    /// Create a project owned by `input.owner_id`.
    ///
    /// # Examples
    /// ```
    /// use service::mock::MockStore;
    /// use service::projects::{domain::NewProject, ProjectService};
    /// use std::sync::Arc;
    /// let store = Arc::new(MockStore::default());
    /// let svc = ProjectService::new(store.clone(), store);
    /// let input = NewProject { title: "Roadmap".into(), owner_id: "u1".into(), ..Default::default() };
    /// let project = tokio_test::block_on(svc.create_project(input)).unwrap();
    /// assert_eq!(project.status, "active");
    /// ```
    #[instrument(skip(self, input), fields(user_id = %input.owner_id))]
    pub async fn create_project(&self, mut input: NewProject) -> Result<Project, ServiceError> {
        models::project::validate_owner(&input.owner_id)?;
        models::project::validate_title(&input.title)?;
        models::project::validate_status(&input.status)?;
        input.company_id = input.company_id.filter(|c| !c.is_empty());
        if let Some(company_id) = input.company_id.as_deref() {
            models::project::validate_company_ref(company_id)?;
        }

        if let Some(company_id) = input.company_id.as_deref() {
            let member = self.company_member_of(company_id, &input.owner_id).await;
            if !policy::can_create_in_company(member.as_ref()) {
                return Err(ServiceError::forbidden("create projects in this company"));
            }
        }

        let project = self.repo.create_project(&input, Utc::now()).await?;
        info!(project_id = project.id, company_id = ?project.company_id, "project_created");
        Ok(project)
    }

    #[instrument(skip(self))]
    pub async fn get_project(&self, id: i32, user_id: &str) -> Result<Project, ServiceError> {
        let project = self.load(id).await?;
        if !self.user_can_access_project(user_id, &project).await {
            return Err(ServiceError::forbidden("access this project"));
        }
        Ok(project)
    }

    #[instrument(skip(self, update))]
    pub async fn update_project(&self, id: i32, update: ProjectUpdate, user_id: &str) -> Result<Project, ServiceError> {
        let mut project = self.load(id).await?;
        if !self.user_can_update_project(user_id, &project).await {
            return Err(ServiceError::forbidden("update this project"));
        }
        if let Some(title) = update.title.as_deref().filter(|t| !t.is_empty()) {
            models::project::validate_title(title)?;
        }
        if let Some(status) = update.status.as_deref() {
            models::project::validate_status(status)?;
        }
        update.apply(&mut project);
        project.updated_at = Utc::now();
        let saved = self.repo.update_project(&project).await?;
        info!(project_id = id, "project_updated");
        Ok(saved)
    }

    /// Only the owner may delete. Member rows of the project are left in place.
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: i32, user_id: &str) -> Result<(), ServiceError> {
        let project = self.load(id).await?;
        if !policy::can_delete_project(&project, user_id) {
            return Err(ServiceError::forbidden("delete this project"));
        }
        self.repo.delete_project(id).await?;
        info!(project_id = id, "project_deleted");
        Ok(())
    }

    /// Owned projects first, then projects the user is a member of; each at most once.
    #[instrument(skip(self))]
    pub async fn get_user_projects(&self, user_id: &str) -> Result<Vec<Project>, ServiceError> {
        let mut projects = self.repo.list_owned_projects(user_id).await?;

        for membership in self.repo.list_user_memberships(user_id).await? {
            let Ok(project_id) = membership.project_id.parse::<i32>() else {
                debug!(project_id = %membership.project_id, "skipping non-numeric project id");
                continue;
            };
            match self.repo.find_project(project_id).await {
                Ok(Some(p)) => projects.push(p),
                Ok(None) => debug!(project_id, "skipping membership of missing project"),
                Err(e) => warn!(project_id, error = %e, "project lookup failed; skipping"),
            }
        }

        let mut seen = HashSet::new();
        projects.retain(|p| seen.insert(p.id));
        Ok(projects)
    }

    /// Grant `user_id` a role and permissions on a project.
    ///
    /// # Examples
    /// ```
    /// use service::mock::MockStore;
    /// use service::projects::{domain::NewProject, ProjectService};
    /// use std::sync::Arc;
    /// let store = Arc::new(MockStore::default());
    /// let svc = ProjectService::new(store.clone(), store);
    /// let p = tokio_test::block_on(svc.create_project(NewProject { title: "T".into(), owner_id: "u1".into(), ..Default::default() })).unwrap();
    /// let perms = vec!["update".to_string()];
    /// let m = tokio_test::block_on(svc.add_project_member(p.id, "u2", "editor", &perms, "u1")).unwrap();
    /// assert_eq!(m.project_type, "core");
    /// assert!(tokio_test::block_on(svc.add_project_member(p.id, "u2", "viewer", &[], "u1")).is_err());
    /// ```
    #[instrument(skip(self, user_id, permissions, requesting_user_id), fields(user_id = %requesting_user_id, member_id = %user_id))]
    pub async fn add_project_member(
        &self,
        project_id: i32,
        user_id: &str,
        role: &str,
        permissions: &[String],
        requesting_user_id: &str,
    ) -> Result<ProjectMember, ServiceError> {
        let project = self.load(project_id).await?;
        if !self.user_can_manage_project_members(requesting_user_id, &project).await {
            return Err(ServiceError::forbidden("add members to this project"));
        }
        models::project_member::validate_member(user_id, role)?;
        let permissions = Permission::parse_all(permissions)?;

        let member = NewProjectMember {
            project_id,
            user_id: user_id.to_string(),
            role: role.to_string(),
            permissions,
            joined_at: Utc::now(),
        };
        let created = self.repo.add_project_member(&member).await?;
        info!(project_id, role = %created.role, "project_member_added");
        Ok(created)
    }

    #[instrument(skip(self), fields(user_id = %requesting_user_id))]
    pub async fn get_project_members(&self, project_id: i32, requesting_user_id: &str) -> Result<Vec<ProjectMember>, ServiceError> {
        let project = self.load(project_id).await?;
        if !self.user_can_access_project(requesting_user_id, &project).await {
            return Err(ServiceError::forbidden("access this project"));
        }
        self.repo.list_project_members(project_id).await
    }

    pub async fn user_can_access_project(&self, user_id: &str, project: &Project) -> bool {
        let member = self.project_member_of(project, user_id).await;
        let company_member = match project.company_id.as_deref() {
            Some(company_id) if member.is_none() && project.owner_id != user_id => {
                self.company_member_of(company_id, user_id).await
            }
            _ => None,
        };
        policy::can_access_project(project, user_id, member.as_ref(), company_member.as_ref())
    }

    pub async fn user_can_update_project(&self, user_id: &str, project: &Project) -> bool {
        let member = self.project_member_of(project, user_id).await;
        policy::can_update_project(project, user_id, member.as_ref())
    }

    pub async fn user_can_manage_project_members(&self, user_id: &str, project: &Project) -> bool {
        let member = self.project_member_of(project, user_id).await;
        policy::can_manage_project_members(project, user_id, member.as_ref())
    }

    pub async fn user_can_create_in_company(&self, user_id: &str, company_id: &str) -> bool {
        let member = self.company_member_of(company_id, user_id).await;
        policy::can_create_in_company(member.as_ref())
    }

    async fn load(&self, id: i32) -> Result<Project, ServiceError> {
        self.repo.find_project(id).await?.ok_or_else(|| ServiceError::not_found("project"))
    }

    // Lookup failures deny access rather than fail the request.
    async fn project_member_of(&self, project: &Project, user_id: &str) -> Option<ProjectMember> {
        match self.repo.find_project_member(project.id, user_id).await {
            Ok(member) => member,
            Err(e) => {
                warn!(project_id = project.id, user_id, error = %e, "project member lookup failed");
                None
            }
        }
    }

    async fn company_member_of(&self, company_id: &str, user_id: &str) -> Option<CompanyMember> {
        match self.companies.find_company_member(company_id, user_id).await {
            Ok(member) => member,
            Err(e) => {
                warn!(company_id, user_id, error = %e, "company member lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::domain::{Compensation, MemberStatus, NewCompanyMember};
    use crate::mock::MockStore;
    use crate::test_support::new_project;

    fn setup() -> (Arc<MockStore>, ProjectService<MockStore, MockStore>) {
        let store = Arc::new(MockStore::default());
        (store.clone(), ProjectService::new(store.clone(), store))
    }

    fn company_row(user: &str, role: &str, status: MemberStatus) -> NewCompanyMember {
        let mut m = NewCompanyMember::active("acme", user, role, "owner", Utc::now(), Compensation::default());
        m.status = status;
        m
    }

    fn perms(tokens: &[&str]) -> Vec<String> { tokens.iter().map(|t| t.to_string()).collect() }

    #[tokio::test]
    async fn create_requires_owner_and_title() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        assert!(matches!(svc.create_project(new_project("", "T", None)).await, Err(ServiceError::InvalidInput(_))));
        assert!(matches!(svc.create_project(new_project("u1", " ", None)).await, Err(ServiceError::InvalidInput(_))));

        let mut input = new_project("u1", "T", None);
        input.status = "paused".into();
        let p = svc.create_project(input).await?;
        assert_eq!(p.status, "paused");
        assert_eq!(p.created_at, p.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn create_in_company_needs_privileged_active_role() -> Result<(), anyhow::Error> {
        let (store, svc) = setup();
        store.seed_company_member(&company_row("mgr", "manager", MemberStatus::Active))?;
        store.seed_company_member(&company_row("emp", "employee", MemberStatus::Active))?;
        store.seed_company_member(&company_row("sus", "admin", MemberStatus::Suspended))?;

        assert!(svc.create_project(new_project("mgr", "T", Some("acme"))).await.is_ok());
        for user in ["emp", "sus", "stranger"] {
            let res = svc.create_project(new_project(user, "T", Some("acme"))).await;
            assert!(matches!(res, Err(ServiceError::Forbidden(_))), "{user} should be refused");
        }
        // empty company id means no company
        assert!(svc.create_project(new_project("stranger", "T", Some(""))).await?.company_id.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn get_project_access_rules() -> Result<(), anyhow::Error> {
        let (store, svc) = setup();
        store.seed_company_member(&company_row("owner", "owner", MemberStatus::Active))?;
        store.seed_company_member(&company_row("carol", "employee", MemberStatus::Active))?;
        store.seed_company_member(&company_row("sam", "employee", MemberStatus::Suspended))?;
        let p = svc.create_project(new_project("owner", "T", Some("acme"))).await?;
        svc.add_project_member(p.id, "bob", "viewer", &[], "owner").await?;

        assert_eq!(svc.get_project(p.id, "owner").await?.id, p.id);
        assert!(svc.get_project(p.id, "bob").await.is_ok());
        assert!(svc.get_project(p.id, "carol").await.is_ok());
        assert!(matches!(svc.get_project(p.id, "sam").await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(svc.get_project(p.id, "dave").await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(svc.get_project(p.id + 100, "owner").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn failing_member_lookup_denies_instead_of_erroring() -> Result<(), anyhow::Error> {
        let (store, svc) = setup();
        let p = svc.create_project(new_project("owner", "T", None)).await?;
        svc.add_project_member(p.id, "bob", "editor", &perms(&["update"]), "owner").await?;

        store.fail_member_lookups(true);
        assert!(matches!(svc.get_project(p.id, "bob").await, Err(ServiceError::Forbidden(_))));
        assert!(svc.get_project(p.id, "owner").await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn update_applies_partial_fields_for_permitted_users() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let p = svc.create_project(new_project("owner", "Old", None)).await?;
        svc.add_project_member(p.id, "ed", "editor", &perms(&["update"]), "owner").await?;
        svc.add_project_member(p.id, "ad", "lead", &perms(&["admin"]), "owner").await?;
        svc.add_project_member(p.id, "mm", "hr", &perms(&["manage_members"]), "owner").await?;

        let upd = ProjectUpdate { title: Some(String::new()), status: Some("completed".into()), ..Default::default() };
        let saved = svc.update_project(p.id, upd, "ed").await?;
        assert_eq!(saved.title, "Old");
        assert_eq!(saved.status, "completed");
        assert!(saved.updated_at >= p.updated_at);

        let upd = ProjectUpdate { title: Some("New".into()), ..Default::default() };
        assert_eq!(svc.update_project(p.id, upd, "ad").await?.title, "New");

        let res = svc.update_project(p.id, ProjectUpdate::default(), "mm").await;
        assert!(matches!(res, Err(ServiceError::Forbidden(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_owner_only() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let p = svc.create_project(new_project("owner", "T", None)).await?;
        svc.add_project_member(p.id, "ad", "lead", &perms(&["admin"]), "owner").await?;

        assert!(matches!(svc.delete_project(p.id, "ad").await, Err(ServiceError::Forbidden(_))));
        svc.delete_project(p.id, "owner").await?;
        assert!(matches!(svc.get_project(p.id, "owner").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete_project(p.id, "owner").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn user_projects_are_deduplicated_and_skip_bad_rows() -> Result<(), anyhow::Error> {
        let (store, svc) = setup();
        let own = svc.create_project(new_project("u1", "Own", None)).await?;
        let other = svc.create_project(new_project("u2", "Other", None)).await?;
        let gone = svc.create_project(new_project("u2", "Gone", None)).await?;
        svc.add_project_member(other.id, "u1", "viewer", &[], "u2").await?;
        svc.add_project_member(gone.id, "u1", "viewer", &[], "u2").await?;
        svc.delete_project(gone.id, "u2").await?;
        // owner who is also listed as a member
        store.seed_project_member(&own.id.to_string(), "u1", Utc::now())?;
        store.seed_project_member("legacy-42", "u1", Utc::now())?;

        let ids: Vec<i32> = svc.get_user_projects("u1").await?.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![own.id, other.id]);
        Ok(())
    }

    #[tokio::test]
    async fn add_member_validation_and_conflict() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let p = svc.create_project(new_project("owner", "T", None)).await?;

        let res = svc.add_project_member(p.id + 1, "bob", "viewer", &[], "owner").await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        let res = svc.add_project_member(p.id, "", "viewer", &[], "owner").await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
        let res = svc.add_project_member(p.id, "bob", "", &[], "owner").await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
        let res = svc.add_project_member(p.id, "bob", "viewer", &perms(&["delete"]), "owner").await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
        let res = svc.add_project_member(p.id, "bob", "viewer", &[], "stranger").await;
        assert!(matches!(res, Err(ServiceError::Forbidden(_))));

        svc.add_project_member(p.id, "bob", "viewer", &[], "owner").await?;
        let res = svc.add_project_member(p.id, "bob", "admin", &perms(&["admin"]), "owner").await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_callers_get_forbidden_before_validation() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let p = svc.create_project(new_project("owner", "T", None)).await?;
        let res = svc.add_project_member(p.id, "bob", "viewer", &perms(&["bogus"]), "stranger").await;
        assert!(matches!(res, Err(ServiceError::Forbidden(_))));
        let res = svc.add_project_member(p.id, "", "", &[], "stranger").await;
        assert!(matches!(res, Err(ServiceError::Forbidden(_))));
        Ok(())
    }

    #[tokio::test]
    async fn missing_project_is_not_found() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let res = svc.update_project(42, ProjectUpdate::default(), "owner").await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete_project(42, "owner").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.get_project_members(42, "owner").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn title_limit_counts_characters_on_create_and_update() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let accented = "é".repeat(200);
        let p = svc.create_project(new_project("owner", &accented, None)).await?;
        assert_eq!(p.title, accented);

        let upd = ProjectUpdate { title: Some("t".repeat(300)), ..Default::default() };
        assert!(matches!(svc.update_project(p.id, upd, "owner").await, Err(ServiceError::InvalidInput(_))));
        let upd = ProjectUpdate { status: Some("s".repeat(33)), ..Default::default() };
        assert!(matches!(svc.update_project(p.id, upd, "owner").await, Err(ServiceError::InvalidInput(_))));
        assert_eq!(svc.get_project(p.id, "owner").await?.title, accented);

        let res = svc.create_project(new_project("owner", "T", Some(&"c".repeat(129)))).await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
        let res = svc.add_project_member(p.id, "bob", &"r".repeat(65), &[], "owner").await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delegated_member_management() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let p = svc.create_project(new_project("owner", "T", None)).await?;
        svc.add_project_member(p.id, "hr", "hr", &perms(&["manage_members"]), "owner").await?;
        svc.add_project_member(p.id, "ed", "editor", &perms(&["update"]), "owner").await?;

        svc.add_project_member(p.id, "new", "viewer", &[], "hr").await?;
        let res = svc.add_project_member(p.id, "other", "viewer", &[], "ed").await;
        assert!(matches!(res, Err(ServiceError::Forbidden(_))));

        let members = svc.get_project_members(p.id, "new").await?;
        assert_eq!(members.len(), 3);
        assert!(matches!(svc.get_project_members(p.id, "stranger").await, Err(ServiceError::Forbidden(_))));
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_backed_service() -> Result<(), anyhow::Error> {
        use crate::companies::repo::seaorm::SeaOrmCompanyRepository;
        use crate::projects::repo::seaorm::SeaOrmProjectRepository;

        let db = crate::test_support::sqlite_db().await?;
        let svc = ProjectService::new(
            Arc::new(SeaOrmProjectRepository::new(db.clone())),
            Arc::new(SeaOrmCompanyRepository::new(db)),
        );
        let p = svc.create_project(new_project("u1", "T", None)).await?;
        svc.add_project_member(p.id, "u1", "self", &[], "u1").await?;
        assert!(matches!(svc.add_project_member(p.id, "u1", "self", &[], "u1").await, Err(ServiceError::Conflict(_))));
        assert_eq!(svc.get_user_projects("u1").await?.len(), 1);
        Ok(())
    }
}
