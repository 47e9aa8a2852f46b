use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Project (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub owner_id: String,
    pub company_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation input; an empty `status` means "active".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub owner_id: String,
    pub company_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update. Empty strings and `None` leave the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ProjectUpdate {
    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            project.title = title;
        }
        if let Some(status) = self.status.filter(|s| !s.is_empty()) {
            project.status = status;
        }
        if self.description.is_some() {
            project.description = self.description;
        }
        if self.start_date.is_some() {
            project.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            project.end_date = self.end_date;
        }
    }
}

/// Delegated rights a project member can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Update,
    ManageMembers,
    Admin,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Update => "update",
            Permission::ManageMembers => "manage_members",
            Permission::Admin => "admin",
        }
    }

    /// Parse caller-supplied tokens; any unknown token rejects the whole list.
    pub fn parse_all<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Permission>, ServiceError> {
        tokens.iter().map(|t| t.as_ref().parse()).collect()
    }

    /// Decode stored tokens, dropping the ones this build does not know.
    pub fn from_stored<S: AsRef<str>>(tokens: &[S]) -> Vec<Permission> {
        tokens.iter().filter_map(|t| t.as_ref().parse().ok()).collect()
    }
}

impl FromStr for Permission {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(Permission::Update),
            "manage_members" => Ok(Permission::ManageMembers),
            "admin" => Ok(Permission::Admin),
            other => Err(ServiceError::InvalidInput(format!("unknown permission: {other}"))),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Membership row granting a user delegated rights on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub id: i32,
    /// Text form of the project id, as stored.
    pub project_id: String,
    pub project_type: String,
    pub user_id: String,
    pub role: String,
    pub permissions: Vec<Permission>,
    pub joined_at: DateTime<Utc>,
}

impl ProjectMember {
    pub fn has_any(&self, wanted: &[Permission]) -> bool {
        self.permissions.iter().any(|p| wanted.contains(p))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProjectMember {
    pub project_id: i32,
    pub user_id: String,
    pub role: String,
    pub permissions: Vec<Permission>,
    pub joined_at: DateTime<Utc>,
}
