use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, fields};

pub const DEFAULT_STATUS: &str = "active";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub owner_id: String,
    pub company_id: Option<String>,
    pub start_date: Option<DateTimeWithTimeZone>,
    pub end_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    fields::required("title", title, fields::TITLE_MAX)
}

pub fn validate_owner(owner_id: &str) -> Result<(), errors::ModelError> {
    fields::required("owner ID", owner_id, fields::ID_MAX)
}

pub fn validate_status(status: &str) -> Result<(), errors::ModelError> {
    fields::max_chars("status", status, fields::STATUS_MAX)
}

pub fn validate_company_ref(company_id: &str) -> Result<(), errors::ModelError> {
    fields::max_chars("company ID", company_id, fields::ID_MAX)
}

/// Empty status falls back to [`DEFAULT_STATUS`]; anything else is kept verbatim.
pub fn status_or_default(status: &str) -> String {
    if status.trim().is_empty() { DEFAULT_STATUS.to_string() } else { status.to_string() }
}
