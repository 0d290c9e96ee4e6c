//! Input validation for secret names.
//!
//! GitHub Actions secret names follow environment-variable rules with
//! one extra restriction on the `GITHUB_` prefix.

use crate::core::constants::RESERVED_PREFIX;
use crate::error::ValidationError;

/// Validate a secret name.
///
/// Names must:
/// - contain only A-Z, a-z, 0-9 and underscore
/// - not start with a digit
/// - not start with `GITHUB_` (case-insensitive)
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid(name, "cannot start with a digit".to_string()));
    }

    if let Some((i, ch)) = name
        .chars()
        .enumerate()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric() && *ch != '_')
    {
        return Err(invalid(
            name,
            format!(
                "invalid character '{}' at position {}. Only A-Z, 0-9, and underscore are allowed",
                ch,
                i + 1
            ),
        ));
    }

    if name
        .get(..RESERVED_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(RESERVED_PREFIX))
    {
        return Err(invalid(
            name,
            format!("the {} prefix is reserved", RESERVED_PREFIX),
        ));
    }

    Ok(())
}

fn invalid(name: &str, reason: String) -> ValidationError {
    ValidationError::InvalidName {
        name: name.to_string(),
        reason,
    }
}
