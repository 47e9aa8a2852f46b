use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, fields};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub company_type: String,
    pub owner_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Company ids are chosen by the caller, so they are checked rather than generated.
pub fn validate_id(id: &str) -> Result<(), errors::ModelError> {
    fields::required("company ID", id, fields::ID_MAX)
}

pub fn validate_owner(owner_id: &str) -> Result<(), errors::ModelError> {
    fields::required("owner ID", owner_id, fields::ID_MAX)
}

/// Name and type may be empty; only their length is bounded.
pub fn validate_details(name: &str, company_type: &str) -> Result<(), errors::ModelError> {
    fields::max_chars("name", name, fields::NAME_MAX)?;
    fields::max_chars("type", company_type, fields::TYPE_MAX)
}
