//! Validation of object kinds and uids.
//!
//! Kinds:
//! - 1 to 64 characters
//! - lowercase ASCII letters, digits, `-` and `_`
//! - must start with a letter
//!
//! Uids:
//! - 1 to 128 characters
//! - ASCII letters, digits, `-`, `_` and `.`
//! - must not start with `.` (which also excludes `.` and `..`)

use crate::error::TypeError;

pub const MAX_KIND_LEN: usize = 64;
pub const MAX_UID_LEN: usize = 128;

fn invalid(field: &'static str, value: &str, reason: impl Into<String>) -> TypeError {
    TypeError::InvalidName {
        field,
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Validate an object kind, returning `Ok(())` if valid.
///
/// ```
/// use vos_types::validate_kind;
///
/// assert!(validate_kind("dashboard").is_ok());
/// assert!(validate_kind("alert-rule").is_ok());
/// assert!(validate_kind("").is_err());
/// assert!(validate_kind("Dashboard").is_err());
/// ```
pub fn validate_kind(kind: &str) -> Result<(), TypeError> {
    if kind.is_empty() {
        return Err(invalid("kind", kind, "must not be empty"));
    }
    if kind.len() > MAX_KIND_LEN {
        return Err(invalid("kind", kind, format!("longer than {MAX_KIND_LEN} characters")));
    }
    if !kind.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(invalid("kind", kind, "must start with a lowercase letter"));
    }
    if let Some(ch) = kind
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
    {
        return Err(invalid("kind", kind, format!("contains forbidden character: {ch:?}")));
    }
    Ok(())
}

/// Validate an object uid, returning `Ok(())` if valid.
///
/// ```
/// use vos_types::validate_uid;
///
/// assert!(validate_uid("my-test-entity").is_ok());
/// assert!(validate_uid("v1.2_final").is_ok());
/// assert!(validate_uid("..").is_err());
/// assert!(validate_uid("a/b").is_err());
/// ```
pub fn validate_uid(uid: &str) -> Result<(), TypeError> {
    if uid.is_empty() {
        return Err(invalid("uid", uid, "must not be empty"));
    }
    if uid.len() > MAX_UID_LEN {
        return Err(invalid("uid", uid, format!("longer than {MAX_UID_LEN} characters")));
    }
    if uid.starts_with('.') {
        return Err(invalid("uid", uid, "must not start with '.'"));
    }
    if let Some(ch) = uid
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid("uid", uid, format!("contains forbidden character: {ch:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_kinds() {
        for kind in ["dashboard", "playlist", "alert_rule", "k8s-thing", "a"] {
            assert!(validate_kind(kind).is_ok(), "{kind} should be valid");
        }
    }

    #[test]
    fn invalid_kinds() {
        for kind in ["", "1dash", "-dash", "Dash", "dash board", "dash/board"] {
            assert!(validate_kind(kind).is_err(), "{kind:?} should be invalid");
        }
        assert!(validate_kind(&"k".repeat(MAX_KIND_LEN + 1)).is_err());
    }

    #[test]
    fn valid_uids() {
        for uid in ["my-test-entity", "ABC123", "x.y.z", "_hidden", "a"] {
            assert!(validate_uid(uid).is_ok(), "{uid} should be valid");
        }
        assert!(validate_uid(&"u".repeat(MAX_UID_LEN)).is_ok());
    }

    #[test]
    fn invalid_uids() {
        for uid in ["", ".", "..", ".env", "a b", "a/b", "a\\b", "ünï"] {
            assert!(validate_uid(uid).is_err(), "{uid:?} should be invalid");
        }
        assert!(validate_uid(&"u".repeat(MAX_UID_LEN + 1)).is_err());
    }

    #[test]
    fn error_names_the_field() {
        match validate_uid("a b").unwrap_err() {
            TypeError::InvalidName { field, value, .. } => {
                assert_eq!(field, "uid");
                assert_eq!(value, "a b");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
