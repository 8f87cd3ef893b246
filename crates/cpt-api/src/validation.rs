use cpt_core::plan::{MAX_PLAN_DAYS, MIN_PLAN_DAYS};

use crate::error::ApiError;

/// Longest accepted problem name, topic name, id or link
pub const MAX_FIELD_LEN: usize = 200;

/// Plan length must be within `1..=365` days. Returns the accepted length.
///
/// # Examples
/// ```
/// use cpt_api::validation::validate_plan_days;
///
/// assert_eq!(validate_plan_days(30).unwrap(), 30);
/// assert!(validate_plan_days(0).is_err());
/// assert!(validate_plan_days(-1).is_err());
/// ```
pub fn validate_plan_days(days: i64) -> Result<u32, ApiError> {
    u32::try_from(days)
        .ok()
        .filter(|days| (MIN_PLAN_DAYS..=MAX_PLAN_DAYS).contains(days))
        .ok_or_else(|| {
            ApiError::Validation(format!(
                "Days must be between {MIN_PLAN_DAYS} and {MAX_PLAN_DAYS}"
            ))
        })
}

/// Trim `value`, rejecting blank or overlong input. Returns the trimmed text.
pub fn require_non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{field} cannot be empty")));
    }

    if trimmed.chars().count() > MAX_FIELD_LEN {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {MAX_FIELD_LEN} characters long"
        )));
    }

    Ok(trimmed)
}

/// Optional text field: blank becomes `None`.
pub fn optional_field<'a>(field: &str, value: Option<&'a str>) -> Result<Option<&'a str>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => require_non_blank(field, v).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_plan_days() {
        assert_eq!(validate_plan_days(1).unwrap(), 1);
        assert_eq!(validate_plan_days(365).unwrap(), 365);

        assert!(validate_plan_days(0).is_err());
        assert!(validate_plan_days(366).is_err());
        assert!(validate_plan_days(i64::from(u32::MAX) + 1).is_err());

        match validate_plan_days(-1) {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "Days must be between 1 and 365"),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_require_non_blank() {
        assert_eq!(require_non_blank("Name", "  Two Sum ").unwrap(), "Two Sum");

        assert!(require_non_blank("Name", "").is_err());
        assert!(require_non_blank("Name", " \t ").is_err());
        assert!(require_non_blank("Name", &"x".repeat(201)).is_err());

        match require_non_blank("Topic", "") {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "Topic cannot be empty"),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_optional_field() {
        assert_eq!(optional_field("Link", None).unwrap(), None);
        assert_eq!(optional_field("Link", Some("  ")).unwrap(), None);
        assert_eq!(optional_field("Link", Some(" 42 ")).unwrap(), Some("42"));
        assert!(optional_field("Link", Some(&"x".repeat(201))).is_err());
    }
}
