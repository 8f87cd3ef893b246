use crate::error::ApiError;
use validator::ValidateEmail;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_NAME_LEN: usize = 100;

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::Validation("Email cannot be empty".to_string()));
    }

    if !email.validate_email() {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

/// Length is counted in characters; at least one letter and one digit.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    if len > MAX_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters long"
        )));
    }

    let has_letter = password.chars().any(char::is_alphabetic);
    let has_number = password.chars().any(char::is_numeric);

    if !has_letter || !has_number {
        return Err(ApiError::Validation(
            "Password must contain at least one letter and one number".to_string(),
        ));
    }

    Ok(())
}

/// Display name: non-blank, bounded, no control characters.
pub fn validate_name(name: &str) -> Result<(), ApiError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ApiError::Validation("Name cannot be empty".to_string()));
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::Validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters long"
        )));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(ApiError::Validation(
            "Name cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user+tag@example.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("noNumbers").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password(&format!("a1{}", "x".repeat(127))).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert!(validate_name("  Grace  ").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"n".repeat(101)).is_err());
        assert!(validate_name("bad\u{0007}name").is_err());
    }
}
