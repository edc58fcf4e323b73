use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::names::{validate_kind, validate_uid};

/// Identity of a stored object: a schema `kind` plus a `uid`.
///
/// Unique within an org. Immutable once the object is created; renaming an
/// object means writing a new key and deleting the old one.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    pub kind: String,
    pub uid: String,
}

impl ObjectKey {
    /// Build a key without validation. Use [`Self::parse`] for caller input.
    pub fn new(kind: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            uid: uid.into(),
        }
    }

    /// Build a key, validating both parts.
    pub fn parse(kind: &str, uid: &str) -> Result<Self, TypeError> {
        validate_kind(kind)?;
        validate_uid(uid)?;
        Ok(Self::new(kind, uid))
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({}/{})", self.kind, self.uid)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let key = ObjectKey::new("dashboard", "my-test-entity");
        assert_eq!(key.to_string(), "dashboard/my-test-entity");
    }

    #[test]
    fn parse_validates_both_parts() {
        assert!(ObjectKey::parse("dashboard", "abc").is_ok());
        assert!(ObjectKey::parse("", "abc").is_err());
        assert!(ObjectKey::parse("dashboard", "").is_err());
    }

    #[test]
    fn ordering_is_kind_then_uid() {
        let a = ObjectKey::new("a", "z");
        let b = ObjectKey::new("b", "a");
        let c = ObjectKey::new("b", "b");
        assert!(a < b);
        assert!(b < c);
    }
}
