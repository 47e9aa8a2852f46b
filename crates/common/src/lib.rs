//! Shared building blocks for the project-core crates: logging setup and
//! small transport-neutral types.

pub mod types;
pub mod utils;

/// Service name reported by health and index endpoints.
pub const SERVICE_NAME: &str = "project-core";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::healthy();
        assert_eq!(h.status, "healthy");
        assert_eq!(h.service, SERVICE_NAME);
    }

    #[test]
    fn health_serializes_flat() {
        let v = serde_json::to_value(types::Health::healthy()).unwrap();
        assert_eq!(v["status"], "healthy");
        assert_eq!(v["service"], "project-core");
    }
}
