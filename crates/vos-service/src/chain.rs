//! Version chain rules: minting the next version, checking a caller's
//! expectation against the head, and stamping audit fields.
//!
//! Pure and synchronous. Persistence re-checks the precondition atomically at
//! commit time; the check here only avoids minting for requests that are
//! already known to conflict.

use vos_types::{ObjectKey, ObjectMeta, Timestamp, UserInfo, Version};

use crate::error::{ServiceError, ServiceResult};

/// Audit fields of a new version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditFields {
    pub created: Timestamp,
    pub created_by: UserInfo,
    pub modified: Timestamp,
    pub modified_by: UserInfo,
}

/// The version following `last_minted`, the last version ever issued for the
/// key (including versions of since-deleted objects).
pub fn next_version(last_minted: Option<&Version>) -> ServiceResult<Version> {
    let Some(last) = last_minted else {
        return Ok(Version::initial());
    };
    let seq = last.sequence().ok_or_else(|| {
        ServiceError::Internal(format!("stored version {last} is not a sequence number"))
    })?;
    let next = seq
        .checked_add(1)
        .ok_or_else(|| ServiceError::Internal(format!("version sequence exhausted at {last}")))?;
    Ok(Version::from_sequence(next))
}

/// `expected` must equal `actual` exactly; `None` on both sides means
/// "creating an object that does not exist yet".
pub fn check_precondition(
    key: &ObjectKey,
    expected: Option<&Version>,
    actual: Option<&Version>,
) -> ServiceResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ServiceError::Conflict {
            key: key.clone(),
            expected: expected.cloned(),
            current: actual.cloned(),
        })
    }
}

/// On create both stamps are `(now, actor)`. On update the creation stamp is
/// carried over and `modified` never moves backwards.
pub fn stamp_audit(existing: Option<&ObjectMeta>, actor: &UserInfo, now: Timestamp) -> AuditFields {
    match existing {
        None => AuditFields {
            created: now,
            created_by: actor.clone(),
            modified: now,
            modified_by: actor.clone(),
        },
        Some(prev) => AuditFields {
            created: prev.created,
            created_by: prev.created_by.clone(),
            modified: now.max(prev.modified),
            modified_by: actor.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vos_types::ContentHash;

    fn user(id: i64, login: &str) -> UserInfo {
        UserInfo {
            id,
            login: login.into(),
        }
    }

    #[test]
    fn versions_count_up_from_one() {
        assert_eq!(next_version(None).unwrap(), Version::initial());
        assert_eq!(
            next_version(Some(&Version::from_sequence(41))).unwrap(),
            Version::from_sequence(42)
        );
    }

    #[test]
    fn non_numeric_or_exhausted_history_is_internal() {
        let odd = Version::parse("abc").unwrap();
        assert!(matches!(next_version(Some(&odd)), Err(ServiceError::Internal(_))));
        let max = Version::from_sequence(u64::MAX);
        assert!(matches!(next_version(Some(&max)), Err(ServiceError::Internal(_))));
    }

    #[test]
    fn precondition_requires_exact_match() {
        let key = ObjectKey::new("dashboard", "a");
        let v1 = Version::from_sequence(1);
        let v2 = Version::from_sequence(2);
        assert!(check_precondition(&key, None, None).is_ok());
        assert!(check_precondition(&key, Some(&v1), Some(&v1)).is_ok());
        for (expected, actual) in [(None, Some(&v1)), (Some(&v1), None), (Some(&v1), Some(&v2))] {
            let err = check_precondition(&key, expected, actual).unwrap_err();
            assert!(matches!(err, ServiceError::Conflict { .. }));
        }
    }

    #[test]
    fn create_stamps_both_sides_equally() {
        let now = Timestamp::from_millis(5_000);
        let audit = stamp_audit(None, &user(1, "fake"), now);
        assert_eq!(audit.created, audit.modified);
        assert_eq!(audit.created_by, audit.modified_by);
    }

    #[test]
    fn update_preserves_creation_and_never_goes_back() {
        let prev = ObjectMeta {
            key: ObjectKey::new("dashboard", "a"),
            version: Version::initial(),
            created: Timestamp::from_millis(1_000),
            modified: Timestamp::from_millis(9_000),
            created_by: user(1, "fake"),
            modified_by: user(1, "fake"),
            comment: None,
            etag: ContentHash::from_hash([0; 32]),
            size: 0,
        };

        let later = stamp_audit(Some(&prev), &user(2, "other"), Timestamp::from_millis(10_000));
        assert_eq!(later.created, Timestamp::from_millis(1_000));
        assert_eq!(later.created_by, user(1, "fake"));
        assert_eq!(later.modified, Timestamp::from_millis(10_000));
        assert_eq!(later.modified_by, user(2, "other"));

        let skewed = stamp_audit(Some(&prev), &user(2, "other"), Timestamp::from_millis(500));
        assert_eq!(skewed.modified, Timestamp::from_millis(9_000));
        assert!(!skewed.created.is_after(&skewed.modified));
    }
}
