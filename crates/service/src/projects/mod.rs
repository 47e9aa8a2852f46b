//! Projects: domain, repository, service.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::ProjectService;
