//! Field validation helpers

use super::DomainError;

/// Maximum length of every bounded text column
pub const MAX_TEXT_LEN: usize = 255;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 40;

/// Check that `value` has between `min` and `max` characters
pub fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len < min {
        return Err(DomainError::invalid_field(
            field,
            format!("must be at least {} characters", min),
        ));
    }
    if len > max {
        return Err(DomainError::invalid_field(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

/// Same as [`check_length`] for nullable fields
pub fn check_optional_length(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), DomainError> {
    match value {
        Some(v) => check_length(field, v, 0, max),
        None => Ok(()),
    }
}

/// Minimal address shape check: `local@domain.tld`, no whitespace
pub fn check_email(field: &'static str, value: &str) -> Result<(), DomainError> {
    check_length(field, value, 3, MAX_TEXT_LEN)?;

    let invalid = || DomainError::invalid_field(field, "is not a valid email address");

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Canonical stored form of an email address: trimmed and lowercased
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn check_password(field: &'static str, value: &str) -> Result<(), DomainError> {
    check_length(field, value, PASSWORD_MIN_LEN, PASSWORD_MAX_LEN)
}
