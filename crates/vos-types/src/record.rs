use serde::{Deserialize, Serialize};

use crate::hash::ContentHash;
use crate::identity::UserInfo;
use crate::object::ObjectKey;
use crate::temporal::Timestamp;
use crate::version::Version;

/// Everything recorded about one version of an object except its body.
///
/// Invariants maintained by the service:
/// - `created <= modified`
/// - `created` / `created_by` never change after the first write
/// - `version` changes on every successful write and is never reused
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(flatten)]
    pub key: ObjectKey,
    pub version: Version,
    pub created: Timestamp,
    pub modified: Timestamp,
    pub created_by: UserInfo,
    pub modified_by: UserInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub etag: ContentHash,
    pub size: u64,
}

/// One version of an object, optionally with its body.
///
/// `body` is `None` when the caller asked to omit it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObject {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::encoding::base64_opt"
    )]
    pub body: Option<Vec<u8>>,
}

impl RawObject {
    pub fn key(&self) -> &ObjectKey {
        &self.meta.key
    }

    pub fn version(&self) -> &Version {
        &self.meta.version
    }

    /// Drop the body, keeping metadata.
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }
}
