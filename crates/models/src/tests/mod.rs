/// Connection options and migrations
pub mod db_tests;

/// Membership constraints and transactional writes
pub mod membership_tests;

mod validation_tests {
    use crate::{company, company_member, fields, project, project_member};

    #[test]
    fn company_id_rules() {
        assert!(company::validate_id("acme").is_ok());
        assert!(company::validate_id("").is_err());
        assert!(company::validate_id("   ").is_err());
        assert!(company::validate_id(&"x".repeat(fields::ID_MAX)).is_ok());
        assert!(company::validate_id(&"x".repeat(fields::ID_MAX + 1)).is_err());
        assert!(company::validate_owner("").is_err());
    }

    #[test]
    fn project_title_and_status() {
        assert!(project::validate_title("Roadmap").is_ok());
        assert!(project::validate_title(" ").is_err());
        assert!(project::validate_owner("").is_err());
        assert_eq!(project::status_or_default(""), "active");
        assert_eq!(project::status_or_default("paused"), "paused");
        assert!(project::validate_title(&"é".repeat(fields::TITLE_MAX)).is_ok());
        assert!(project::validate_title(&"t".repeat(fields::TITLE_MAX + 1)).is_err());
        assert!(project::validate_status(&"s".repeat(fields::STATUS_MAX + 1)).is_err());
        assert!(project::validate_company_ref(&"c".repeat(fields::ID_MAX + 1)).is_err());
    }

    #[test]
    fn bounded_company_and_member_columns() {
        assert!(company::validate_details("", "").is_ok());
        assert!(company::validate_details(&"n".repeat(fields::NAME_MAX + 1), "enterprise").is_err());
        assert!(company::validate_details("Acme", &"t".repeat(fields::TYPE_MAX + 1)).is_err());

        assert!(company_member::validate_member("u2", "manager", "u1").is_ok());
        assert!(company_member::validate_member("u2", &"r".repeat(fields::ROLE_MAX + 1), "u1").is_err());
        assert!(company_member::validate_member("u2", "manager", &"i".repeat(fields::ID_MAX + 1)).is_err());
        assert!(project_member::validate_member(&"u".repeat(fields::ID_MAX + 1), "editor").is_err());
        assert!(project_member::validate_member("u2", " ").is_err());
    }

    #[test]
    fn permissions_column_codec() {
        let raw = project_member::encode_permissions(&["update", "admin"]).unwrap();
        assert_eq!(raw, r#"["update","admin"]"#);
        assert_eq!(project_member::decode_permissions(&raw), vec!["update", "admin"]);
        assert!(project_member::decode_permissions("not json").is_empty());
        assert_eq!(project_member::encode_permissions::<&str>(&[]).unwrap(), "[]");
    }
}
