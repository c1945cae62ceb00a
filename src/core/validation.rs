//! Input validation for keyref operations.
//!
//! Validates secret paths, values, and the names that become namespace
//! components. Namespace components must never contain the namespace
//! separator, otherwise two different (namespace, key) pairs could map to
//! the same physical key.

use crate::core::constants::NAMESPACE_SEPARATOR;
use crate::error::{Result, ValidationError};

/// Validate a secret path (the logical key stored in a backend).
///
/// Paths may contain `/` to group secrets (`secrets/api_key`), but:
/// - Cannot be empty
/// - Cannot start or end with `/`, or contain empty segments (`a//b`)
/// - Only ASCII alphanumerics and `_`, `-`, `.`, `/` are allowed
///
/// # Errors
///
/// Returns `ValidationError` if the path is invalid.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }

    if key.split(NAMESPACE_SEPARATOR).any(str::is_empty) {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: "empty path segment".to_string(),
        }
        .into());
    }

    for (i, ch) in key.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && !matches!(ch, '_' | '-' | '.' | '/') {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only A-Z, a-z, 0-9, '_', '-', '.' and '/' are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate a secret value.
///
/// Secret values cannot be empty.
///
/// # Errors
///
/// Returns `ValidationError` if the value is empty.
pub fn validate_value(key: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue(key.to_string()).into());
    }

    Ok(())
}

/// Validate a name used as a namespace component or label.
///
/// Used for project, profile, backend, and team member names.
/// Only ASCII alphanumerics, `_`, `-` and `.` are allowed; `.` and `..`
/// alone are rejected.
///
/// # Arguments
///
/// * `kind` - What is being named, for error messages (e.g. "project")
/// * `name` - The name to validate
///
/// # Errors
///
/// Returns `ValidationError::InvalidName` if the name is invalid.
pub fn validate_name(kind: &'static str, name: &str) -> Result<()> {
    let invalid = |reason: &str| -> crate::error::Error {
        ValidationError::InvalidName {
            kind,
            name: name.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    if name.is_empty() {
        return Err(invalid("cannot be empty"));
    }

    if name == "." || name == ".." {
        return Err(invalid("reserved name"));
    }

    if name.contains(NAMESPACE_SEPARATOR) {
        return Err(invalid("cannot contain '/'"));
    }

    if let Some(ch) = name
        .chars()
        .find(|ch| !ch.is_ascii_alphanumeric() && !matches!(ch, '_' | '-' | '.'))
    {
        return Err(invalid(&format!("invalid character '{}'", ch)));
    }

    Ok(())
}

/// Validate file permissions (Unix only).
///
/// Checks that a file has the expected permissions mode.
///
/// # Errors
///
/// Returns `ValidationError` if permissions don't match.
#[cfg(unix)]
pub fn validate_file_permissions(path: &std::path::Path, expected_mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let actual_mode = metadata.permissions().mode() & 0o777;

    if actual_mode != expected_mode {
        return Err(ValidationError::InvalidPermissions {
            path: path.display().to_string(),
            expected: format!("{:o}", expected_mode),
            actual: format!("{:o}", actual_mode),
        }
        .into());
    }

    Ok(())
}
