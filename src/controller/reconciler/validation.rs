//! # Validation
//!
//! Local checks of a spec before it is sent to Sentry. Sentry would reject
//! these values with a 400; catching them here gives a clearer message and
//! saves the round trip.

use super::error::ReconcileError;
use regex::Regex;

/// Maximum length of Sentry names and slugs
pub const MAX_LENGTH: usize = 50;

/// Validate a Sentry slug (team, project)
///
/// # Errors
///
/// Returns [`ReconcileError::InvalidSpec`] describing the first violated rule.
pub fn validate_slug(field: &str, value: &str) -> Result<(), ReconcileError> {
    let slug_regex = Regex::new(r"^[a-z0-9_-]+$")
        .map_err(|e| ReconcileError::InvalidSpec(format!("failed to compile slug pattern: {e}")))?;

    if value.is_empty() || value.len() > MAX_LENGTH {
        return Err(ReconcileError::InvalidSpec(format!(
            "{field} must be between 1 and {MAX_LENGTH} characters, got '{value}'"
        )));
    }
    if !slug_regex.is_match(value) {
        return Err(ReconcileError::InvalidSpec(format!(
            "{field} '{value}' may only contain lowercase letters, numbers, '-' and '_'"
        )));
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReconcileError::InvalidSpec(format!(
            "{field} '{value}' cannot be entirely numeric"
        )));
    }
    Ok(())
}

/// Validate a display name
///
/// # Errors
///
/// Returns [`ReconcileError::InvalidSpec`] when the trimmed name is empty or too long.
pub fn validate_name(field: &str, value: &str) -> Result<(), ReconcileError> {
    let length = value.trim().chars().count();
    if length == 0 || length > MAX_LENGTH {
        return Err(ReconcileError::InvalidSpec(format!(
            "{field} must be between 1 and {MAX_LENGTH} characters, got '{value}'"
        )));
    }
    Ok(())
}
