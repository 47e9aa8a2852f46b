use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";

/// Company (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub company_type: String,
    pub owner_id: String,
}

/// Partial update; empty or missing fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub company_type: Option<String>,
}

impl CompanyUpdate {
    pub fn apply(self, company: &mut Company) {
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            company.name = name;
        }
        if let Some(kind) = self.company_type.filter(|k| !k.is_empty()) {
            company.company_type = kind;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Invited,
    Suspended,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Invited => "invited",
            MemberStatus::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<MemberStatus> {
        match s {
            "active" => Some(MemberStatus::Active),
            "invited" => Some(MemberStatus::Invited),
            "suspended" => Some(MemberStatus::Suspended),
            _ => None,
        }
    }
}

/// Optional pay attached to a membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub salary: Option<f64>,
    pub hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyMember {
    pub id: i32,
    pub company_id: String,
    pub user_id: String,
    pub role: String,
    pub status: MemberStatus,
    pub joined_at: Option<DateTime<Utc>>,
    pub invited_at: DateTime<Utc>,
    pub invited_by: String,
    pub salary: Option<f64>,
    pub hourly_rate: Option<f64>,
}

impl CompanyMember {
    pub fn is_active(&self) -> bool { self.status == MemberStatus::Active }

    /// Active and holding one of `roles`.
    pub fn is_active_with_role(&self, roles: &[&str]) -> bool {
        self.is_active() && roles.contains(&self.role.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompanyMember {
    pub company_id: String,
    pub user_id: String,
    pub role: String,
    pub status: MemberStatus,
    pub joined_at: Option<DateTime<Utc>>,
    pub invited_at: DateTime<Utc>,
    pub invited_by: String,
    pub salary: Option<f64>,
    pub hourly_rate: Option<f64>,
}

impl NewCompanyMember {
    /// Membership that is active immediately: joined and invited at `now`.
    pub fn active(company_id: &str, user_id: &str, role: &str, invited_by: &str, now: DateTime<Utc>, pay: Compensation) -> Self {
        Self {
            company_id: company_id.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
            status: MemberStatus::Active,
            joined_at: Some(now),
            invited_at: now,
            invited_by: invited_by.to_string(),
            salary: pay.salary,
            hourly_rate: pay.hourly_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tokens() {
        assert_eq!(MemberStatus::parse("active"), Some(MemberStatus::Active));
        assert_eq!(MemberStatus::parse("ACTIVE"), None);
        assert_eq!(MemberStatus::Suspended.as_str(), "suspended");
    }

    #[test]
    fn only_active_roles_count() {
        let now = Utc::now();
        let mut m = NewCompanyMember::active("c", "u", ROLE_MANAGER, "o", now, Compensation::default());
        assert_eq!(m.joined_at, Some(now));
        m.status = MemberStatus::Suspended;
        let member = CompanyMember {
            id: 1,
            company_id: m.company_id,
            user_id: m.user_id,
            role: m.role,
            status: m.status,
            joined_at: m.joined_at,
            invited_at: m.invited_at,
            invited_by: m.invited_by,
            salary: None,
            hourly_rate: None,
        };
        assert!(!member.is_active_with_role(&[ROLE_MANAGER]));
    }

    #[test]
    fn company_update_skips_empty() {
        let mut c = Company { id: "c".into(), name: "Acme".into(), company_type: "enterprise".into(), owner_id: "o".into() };
        CompanyUpdate { name: Some(String::new()), company_type: Some("school".into()) }.apply(&mut c);
        assert_eq!(c.name, "Acme");
        assert_eq!(c.company_type, "school");
    }
}
