use vos_types::{OrgId, Principal, UserInfo};

use crate::metadata::RequestMetadata;

/// Per-request context produced by successful authentication.
///
/// This is the only way downstream code learns who is calling. The
/// credential has already been removed from `metadata`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedContext {
    principal: Principal,
    metadata: RequestMetadata,
}

impl AuthenticatedContext {
    pub fn new(principal: Principal, metadata: RequestMetadata) -> Self {
        Self {
            principal,
            metadata,
        }
    }

    /// A context with no remaining metadata; for in-process callers and tests.
    pub fn for_principal(principal: Principal) -> Self {
        Self::new(principal, RequestMetadata::new())
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn org_id(&self) -> OrgId {
        self.principal.org_id
    }

    /// The actor to record as `created_by` / `modified_by`.
    pub fn actor(&self) -> UserInfo {
        self.principal.user_info()
    }

    /// Request metadata with the credential stripped.
    pub fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}
