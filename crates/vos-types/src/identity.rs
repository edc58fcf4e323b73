use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Tenant scope. Object uids are unique per `(org, kind)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(pub i64);

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "org:{}", self.0)
    }
}

/// Organisation role, ordered `Viewer < Editor < Admin`.
///
/// A higher role includes every privilege of the lower ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Editor,
    Admin,
}

impl Role {
    /// Returns `true` if this role grants at least `required`.
    pub fn includes(&self, required: Role) -> bool {
        *self >= required
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(TypeError::UnknownRole(s.to_string())),
        }
    }
}

/// A resolved, authenticated identity.
///
/// Owned by the identity registry; the store only reads it. Every mutation
/// is attributed to the principal of the request that made it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub login: String,
    pub org_id: OrgId,
    pub role: Role,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub service_account: bool,
}

impl Principal {
    /// Returns `true` if the principal's role grants at least `required`.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.includes(required)
    }

    /// The audit projection recorded on stored versions.
    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            login: self.login.clone(),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} ({}, {})", self.login, self.id, self.org_id, self.role)
    }
}

/// Actor recorded as `created_by` / `modified_by`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub login: String,
}
