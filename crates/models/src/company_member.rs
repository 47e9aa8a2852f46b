use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, fields};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: String,
    pub user_id: String,
    pub role: String,
    pub status: String,
    /// Null while the membership is still an invitation.
    pub joined_at: Option<DateTimeWithTimeZone>,
    pub invited_at: DateTimeWithTimeZone,
    pub invited_by: String,
    pub salary: Option<f64>,
    pub hourly_rate: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_member(user_id: &str, role: &str, invited_by: &str) -> Result<(), errors::ModelError> {
    fields::required("user ID", user_id, fields::ID_MAX)?;
    fields::required("role", role, fields::ROLE_MAX)?;
    fields::max_chars("inviter ID", invited_by, fields::ID_MAX)
}
