pub mod errors;
pub mod db;
pub mod fields;
pub mod company;
pub mod company_member;
pub mod project;
pub mod project_member;

#[cfg(test)]
mod tests;
