//! Access rules as pure predicates.
//!
//! Callers look up the acting user's membership rows and pass them in;
//! `None` means "no row", which never grants anything. Owners are matched
//! by id and need no membership row.

use crate::companies::domain::{Company, CompanyMember, ROLE_ADMIN, ROLE_MANAGER, ROLE_OWNER};
use crate::projects::domain::{Permission, Project, ProjectMember};

/// Owner, any project member, or an active member of the project's company.
///
/// `company_member` must be the user's row in `project.company_id`.
pub fn can_access_project(
    project: &Project,
    user_id: &str,
    project_member: Option<&ProjectMember>,
    company_member: Option<&CompanyMember>,
) -> bool {
    if project.owner_id == user_id || project_member.is_some() {
        return true;
    }
    project.company_id.is_some() && company_member.is_some_and(|m| m.is_active())
}

pub fn can_update_project(project: &Project, user_id: &str, member: Option<&ProjectMember>) -> bool {
    project.owner_id == user_id || member.is_some_and(|m| m.has_any(&[Permission::Update, Permission::Admin]))
}

pub fn can_manage_project_members(project: &Project, user_id: &str, member: Option<&ProjectMember>) -> bool {
    project.owner_id == user_id || member.is_some_and(|m| m.has_any(&[Permission::ManageMembers, Permission::Admin]))
}

/// Deletion is never delegated.
pub fn can_delete_project(project: &Project, user_id: &str) -> bool { project.owner_id == user_id }

pub fn can_create_in_company(member: Option<&CompanyMember>) -> bool {
    member.is_some_and(|m| m.is_active_with_role(&[ROLE_OWNER, ROLE_ADMIN, ROLE_MANAGER]))
}

pub fn can_access_company(member: Option<&CompanyMember>) -> bool { member.is_some_and(|m| m.is_active()) }

pub fn can_update_company(company: &Company, user_id: &str, member: Option<&CompanyMember>) -> bool {
    company.owner_id == user_id || member.is_some_and(|m| m.is_active_with_role(&[ROLE_ADMIN]))
}

pub fn can_delete_company(company: &Company, user_id: &str) -> bool { company.owner_id == user_id }

pub fn can_manage_company_members(company: &Company, user_id: &str, member: Option<&CompanyMember>) -> bool {
    company.owner_id == user_id || member.is_some_and(|m| m.is_active_with_role(&[ROLE_ADMIN, ROLE_MANAGER]))
}

/// Managers may remove anyone and members may remove themselves, but the
/// owner can never be removed.
pub fn can_remove_company_member(
    company: &Company,
    target_user_id: &str,
    requesting_user_id: &str,
    requester_member: Option<&CompanyMember>,
) -> bool {
    if company.owner_id == target_user_id {
        return false;
    }
    target_user_id == requesting_user_id || can_manage_company_members(company, requesting_user_id, requester_member)
}
