use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, fields};

/// Tag written on rows created by this service.
pub const CORE_PROJECT_TYPE: &str = "core";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Decimal project id kept as text.
    pub project_id: String,
    pub project_type: String,
    pub user_id: String,
    pub role: String,
    /// JSON array of permission tokens.
    #[sea_orm(column_type = "Text")]
    pub permissions: String,
    pub joined_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_member(user_id: &str, role: &str) -> Result<(), errors::ModelError> {
    fields::required("user ID", user_id, fields::ID_MAX)?;
    fields::required("role", role, fields::ROLE_MAX)
}

pub fn encode_permissions<S: AsRef<str>>(tokens: &[S]) -> Result<String, errors::ModelError> {
    let list: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
    serde_json::to_string(&list).map_err(|e| errors::ModelError::Validation(e.to_string()))
}

/// Malformed column content decodes to no permissions.
pub fn decode_permissions(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}
