//! Request and response messages of the object RPC surface.
//!
//! Version tokens arrive as plain strings and are validated by the service,
//! so a syntactically bad token is a `malformed_request` rather than a
//! decoding failure. Binary bodies travel as standard base64.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vos_types::{ContentHash, ObjectKey, RawObject, Summary, Timestamp, UserInfo, Version};

pub const PROTOCOL_VERSION: u32 = 1;

fn yes() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub uid: String,
    /// Specific version to read; the head when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub with_body: bool,
    #[serde(default = "yes")]
    pub with_summary: bool,
}

/// `object` is `null` when nothing exists at the key (or version).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadResponse {
    pub object: Option<RawObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default, with = "vos_types::encoding::base64_bytes")]
    pub body: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Expected current version. Absent means "create; fail if it exists".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Created,
    Updated,
}

/// The stored version without its body, plus the derived summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    pub object: RawObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    pub status: WriteStatus,
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub uid: String,
    /// Required: the version the caller believes is current.
    #[serde(default)]
    pub previous_version: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid_prefix: Option<String>,
    /// Every entry must match the summary's labels; an empty value matches
    /// any value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Opaque token from a previous response's `next_continue_token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub filter: ListFilter,
}

/// One listed object. Never carries a body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(flatten)]
    pub key: ObjectKey,
    pub version: Version,
    pub modified: Timestamp,
    pub modified_by: UserInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<ListItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_continue_token: Option<String>,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub uid: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: Version,
    pub modified: Timestamp,
    pub modified_by: UserInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub etag: ContentHash,
    pub size: u64,
}

/// Versions oldest first; empty when the object does not exist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub versions: Vec<VersionInfo>,
}
