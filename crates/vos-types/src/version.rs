use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Maximum length of a version token.
pub const MAX_VERSION_LEN: usize = 64;

/// Opaque version token for one object.
///
/// Callers treat versions as opaque strings: they echo back the token they
/// last read as the optimistic-concurrency precondition of their next write.
/// This store mints decimal counters (`"1"`, `"2"`, ...) but accepts any
/// non-empty token of printable ASCII, so tokens minted by other backends
/// still compare correctly.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// The first version minted for a new key.
    pub fn initial() -> Self {
        Self::from_sequence(1)
    }

    /// A counter-style token.
    pub fn from_sequence(seq: u64) -> Self {
        Self(seq.to_string())
    }

    /// Parse and validate a caller-supplied token.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidVersion {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        if s.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if s.len() > MAX_VERSION_LEN {
            return Err(invalid("too long"));
        }
        if !s.chars().all(|c| c.is_ascii_graphic()) {
            return Err(invalid("must be printable ASCII without whitespace"));
        }
        Ok(Self(s.to_string()))
    }

    /// The counter value, if this token is a canonical decimal counter.
    ///
    /// `"007"` is not canonical and yields `None`.
    pub fn sequence(&self) -> Option<u64> {
        let n: u64 = self.0.parse().ok()?;
        (n.to_string() == self.0).then_some(n)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this token may be minted after `last` for the same
    /// key. Counters must strictly increase; opaque tokens only have to
    /// differ.
    pub fn supersedes(&self, last: &Version) -> bool {
        match (self.sequence(), last.sequence()) {
            (Some(next), Some(last)) => next > last,
            _ => self != last,
        }
    }
}

impl FromStr for Version {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
