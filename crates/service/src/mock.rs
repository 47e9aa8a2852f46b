//! In-memory store implementing both repository traits, for tests and doc
//! examples. Unique membership keys are enforced the way the database
//! indexes enforce them.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::companies::domain::{Company, CompanyMember, MemberStatus, NewCompanyMember};
use crate::companies::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::projects::domain::{NewProject, NewProjectMember, Project, ProjectMember};
use crate::projects::repository::ProjectRepository;

#[derive(Default)]
struct State {
    next_id: i32,
    projects: BTreeMap<i32, Project>,
    project_members: Vec<ProjectMember>,
    companies: BTreeMap<String, Company>,
    company_members: Vec<CompanyMember>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn company_member_row(&mut self, m: &NewCompanyMember) -> CompanyMember {
        CompanyMember {
            id: self.next_id(),
            company_id: m.company_id.clone(),
            user_id: m.user_id.clone(),
            role: m.role.clone(),
            status: m.status,
            joined_at: m.joined_at,
            invited_at: m.invited_at,
            invited_by: m.invited_by.clone(),
            salary: m.salary,
            hourly_rate: m.hourly_rate,
        }
    }
}

#[derive(Default)]
pub struct MockStore {
    state: Mutex<State>,
    fail_member_lookups: AtomicBool,
    fail_company_lookups: AtomicBool,
}

impl MockStore {
    fn state(&self) -> Result<MutexGuard<'_, State>, ServiceError> {
        self.state.lock().map_err(|_| ServiceError::Db("mock store poisoned".into()))
    }

    /// Make single-row member lookups (project and company) fail.
    pub fn fail_member_lookups(&self, on: bool) { self.fail_member_lookups.store(on, Ordering::SeqCst); }

    /// Make `find_company` fail.
    pub fn fail_company_lookups(&self, on: bool) { self.fail_company_lookups.store(on, Ordering::SeqCst); }

    /// Insert a project member row with an arbitrary project id, bypassing checks.
    pub fn seed_project_member(&self, project_id: &str, user_id: &str, joined_at: DateTime<Utc>) -> Result<(), ServiceError> {
        let mut st = self.state()?;
        let id = st.next_id();
        st.project_members.push(ProjectMember {
            id,
            project_id: project_id.to_string(),
            project_type: models::project_member::CORE_PROJECT_TYPE.to_string(),
            user_id: user_id.to_string(),
            role: "viewer".into(),
            permissions: Vec::new(),
            joined_at,
        });
        Ok(())
    }

    /// Insert a company member row without requiring the company to exist.
    pub fn seed_company_member(&self, member: &NewCompanyMember) -> Result<(), ServiceError> {
        let mut st = self.state()?;
        let row = st.company_member_row(member);
        st.company_members.push(row);
        Ok(())
    }

    pub fn company_member_count(&self, company_id: &str) -> usize {
        self.state().map(|st| st.company_members.iter().filter(|m| m.company_id == company_id).count()).unwrap_or(0)
    }
}

#[async_trait]
impl ProjectRepository for MockStore {
    async fn create_project(&self, input: &NewProject, now: DateTime<Utc>) -> Result<Project, ServiceError> {
        let mut st = self.state()?;
        let id = st.next_id();
        let p = Project {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: models::project::status_or_default(&input.status),
            owner_id: input.owner_id.clone(),
            company_id: input.company_id.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        };
        st.projects.insert(id, p.clone());
        Ok(p)
    }

    async fn find_project(&self, id: i32) -> Result<Option<Project>, ServiceError> {
        Ok(self.state()?.projects.get(&id).cloned())
    }

    async fn update_project(&self, project: &Project) -> Result<Project, ServiceError> {
        let mut st = self.state()?;
        match st.projects.get_mut(&project.id) {
            Some(slot) => {
                *slot = project.clone();
                Ok(project.clone())
            }
            None => Err(ServiceError::not_found("project")),
        }
    }

    async fn delete_project(&self, id: i32) -> Result<(), ServiceError> {
        self.state()?.projects.remove(&id);
        Ok(())
    }

    async fn list_owned_projects(&self, user_id: &str) -> Result<Vec<Project>, ServiceError> {
        Ok(self.state()?.projects.values().filter(|p| p.owner_id == user_id).cloned().collect())
    }

    async fn find_project_member(&self, project_id: i32, user_id: &str) -> Result<Option<ProjectMember>, ServiceError> {
        if self.fail_member_lookups.load(Ordering::SeqCst) {
            return Err(ServiceError::Db("member lookup failed".into()));
        }
        let key = project_id.to_string();
        Ok(self.state()?.project_members.iter().find(|m| m.project_id == key && m.user_id == user_id).cloned())
    }

    async fn list_project_members(&self, project_id: i32) -> Result<Vec<ProjectMember>, ServiceError> {
        let key = project_id.to_string();
        Ok(self.state()?.project_members.iter().filter(|m| m.project_id == key).cloned().collect())
    }

    async fn list_user_memberships(&self, user_id: &str) -> Result<Vec<ProjectMember>, ServiceError> {
        Ok(self.state()?.project_members.iter().filter(|m| m.user_id == user_id).cloned().collect())
    }

    async fn add_project_member(&self, member: &NewProjectMember) -> Result<ProjectMember, ServiceError> {
        let mut st = self.state()?;
        let key = member.project_id.to_string();
        if st.project_members.iter().any(|m| m.project_id == key && m.user_id == member.user_id) {
            return Err(ServiceError::Conflict("user is already a member of this project".into()));
        }
        let row = ProjectMember {
            id: st.next_id(),
            project_id: key,
            project_type: models::project_member::CORE_PROJECT_TYPE.to_string(),
            user_id: member.user_id.clone(),
            role: member.role.clone(),
            permissions: member.permissions.clone(),
            joined_at: member.joined_at,
        };
        st.project_members.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl CompanyRepository for MockStore {
    async fn create_company(&self, company: &Company, owner: &NewCompanyMember) -> Result<Company, ServiceError> {
        let mut st = self.state()?;
        if st.companies.contains_key(&company.id) {
            return Err(ServiceError::Conflict("company already exists".into()));
        }
        st.companies.insert(company.id.clone(), company.clone());
        let row = st.company_member_row(owner);
        st.company_members.push(row);
        Ok(company.clone())
    }

    async fn find_company(&self, id: &str) -> Result<Option<Company>, ServiceError> {
        if self.fail_company_lookups.load(Ordering::SeqCst) {
            return Err(ServiceError::Db("company lookup failed".into()));
        }
        Ok(self.state()?.companies.get(id).cloned())
    }

    async fn update_company(&self, company: &Company) -> Result<Company, ServiceError> {
        let mut st = self.state()?;
        match st.companies.get_mut(&company.id) {
            Some(slot) => {
                *slot = company.clone();
                Ok(company.clone())
            }
            None => Err(ServiceError::not_found("company")),
        }
    }

    async fn delete_company(&self, id: &str) -> Result<(), ServiceError> {
        let mut st = self.state()?;
        st.company_members.retain(|m| m.company_id != id);
        st.companies.remove(id);
        Ok(())
    }

    async fn find_company_member(&self, company_id: &str, user_id: &str) -> Result<Option<CompanyMember>, ServiceError> {
        if self.fail_member_lookups.load(Ordering::SeqCst) {
            return Err(ServiceError::Db("member lookup failed".into()));
        }
        Ok(self.state()?.company_members.iter().find(|m| m.company_id == company_id && m.user_id == user_id).cloned())
    }

    async fn list_company_members(&self, company_id: &str) -> Result<Vec<CompanyMember>, ServiceError> {
        Ok(self.state()?.company_members.iter().filter(|m| m.company_id == company_id).cloned().collect())
    }

    async fn list_active_memberships(&self, user_id: &str) -> Result<Vec<CompanyMember>, ServiceError> {
        Ok(self
            .state()?
            .company_members
            .iter()
            .filter(|m| m.user_id == user_id && m.status == MemberStatus::Active)
            .cloned()
            .collect())
    }

    async fn add_company_member(&self, member: &NewCompanyMember) -> Result<CompanyMember, ServiceError> {
        let mut st = self.state()?;
        if st.company_members.iter().any(|m| m.company_id == member.company_id && m.user_id == member.user_id) {
            return Err(ServiceError::Conflict("user is already a member of this company".into()));
        }
        let row = st.company_member_row(member);
        st.company_members.push(row.clone());
        Ok(row)
    }

    async fn remove_company_member(&self, company_id: &str, user_id: &str) -> Result<(), ServiceError> {
        self.state()?.company_members.retain(|m| !(m.company_id == company_id && m.user_id == user_id));
        Ok(())
    }
}
