//! Column bounds shared by the entity validators. Lengths count characters,
//! matching `varchar(n)` in Postgres.

use crate::errors::ModelError;

pub const ID_MAX: usize = 128;
pub const TITLE_MAX: usize = 255;
pub const NAME_MAX: usize = 255;
pub const TYPE_MAX: usize = 64;
pub const ROLE_MAX: usize = 64;
pub const STATUS_MAX: usize = 32;

pub fn max_chars(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} longer than {max} characters")));
    }
    Ok(())
}

/// Non-blank and within `max` characters.
pub fn required(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    max_chars(field, value, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_count_characters_not_bytes() {
        let accented = "é".repeat(TITLE_MAX);
        assert_eq!(accented.len(), 2 * TITLE_MAX);
        assert!(max_chars("title", &accented, TITLE_MAX).is_ok());

        let err = max_chars("title", &"a".repeat(TITLE_MAX + 1), TITLE_MAX).unwrap_err();
        assert_eq!(err.to_string(), "validation error: title longer than 255 characters");
    }

    #[test]
    fn required_rejects_blank() {
        assert!(required("role", "  ", ROLE_MAX).is_err());
        assert!(required("role", "admin", ROLE_MAX).is_ok());
    }
}
