//! Service layer for projects and companies.
//! - Each domain is split into domain types, a repository trait, a SeaORM
//!   repository and a service that evaluates access rules per operation.
//! - Access rules live in [`policy`] as pure functions over domain values.
//! - [`mock::MockStore`] backs tests and doc examples without a database.

pub mod errors;
pub mod policy;
pub mod projects;
pub mod companies;
pub mod mock;
#[cfg(test)]
pub mod test_support;

pub use companies::CompanyService;
pub use errors::ServiceError;
pub use projects::ProjectService;
