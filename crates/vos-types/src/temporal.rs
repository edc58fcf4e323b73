use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant with millisecond precision.
///
/// Audit stamps (`created`, `modified`) are `Timestamp`s. Stored as
/// milliseconds since the UNIX epoch so they persist as plain integers and
/// order numerically.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from milliseconds since the UNIX epoch.
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// The UNIX epoch.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Milliseconds since the UNIX epoch.
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Whole seconds since the UNIX epoch (floored).
    pub const fn as_secs(&self) -> i64 {
        self.0.div_euclid(1000)
    }

    /// Returns `true` if this timestamp is strictly after `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns `true` if this timestamp is strictly before `other`.
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }

    /// Convert to a `chrono` UTC datetime, if representable.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_numeric() {
        let a = Timestamp::from_millis(100);
        let b = Timestamp::from_millis(200);
        assert!(a < b);
        assert!(b.is_after(&a));
        assert!(a.is_before(&b));
        assert!(!a.is_after(&a));
    }

    #[test]
    fn now_produces_reasonable_timestamp() {
        // After 2020-01-01.
        assert!(Timestamp::now().as_millis() > 1_577_836_800_000);
    }

    #[test]
    fn seconds_floor_negative_values() {
        assert_eq!(Timestamp::from_millis(1999).as_secs(), 1);
        assert_eq!(Timestamp::from_millis(-1).as_secs(), -1);
    }

    #[test]
    fn display_is_rfc3339() {
        let ts = Timestamp::from_millis(1_000);
        assert_eq!(ts.to_string(), "1970-01-01T00:00:01.000Z");
    }

    #[test]
    fn serde_is_plain_integer() {
        let ts = Timestamp::from_millis(1_234_567);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1234567");
        let back: Timestamp = serde_json::from_str("1234567").unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn chrono_conversion_roundtrips() {
        let ts = Timestamp::from_millis(1_700_000_000_123);
        let dt = ts.to_datetime().unwrap();
        assert_eq!(Timestamp::from(dt), ts);
    }
}
