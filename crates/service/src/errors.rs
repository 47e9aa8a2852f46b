use models::errors::ModelError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn forbidden(action: &str) -> Self { Self::Forbidden(format!("user cannot {}", action)) }

    /// Map a store error, turning unique index violations into `Conflict(msg)`.
    pub fn from_db_conflict(err: DbErr, msg: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict(msg.to_string()),
            _ => Self::Db(err.to_string()),
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => ServiceError::InvalidInput(msg),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self { ServiceError::Db(err.to_string()) }
}
