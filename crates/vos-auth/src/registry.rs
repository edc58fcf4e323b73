use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vos_types::{OrgId, Principal, Timestamp};

use crate::config::AuthConfig;
use crate::error::RegistryResult;

/// An issued API key as the registry stores it. The secret is never stored,
/// only its lookup hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    pub id: i64,
    pub name: String,
    pub org_id: OrgId,
    /// Hex lookup hash of the key (see `PrefixedKey::lookup_hash`).
    pub hash: String,
    /// The service account the key acts as.
    #[serde(default)]
    pub service_account_id: Option<i64>,
    #[serde(default, rename = "expires_ms", skip_serializing_if = "Option::is_none")]
    pub expires: Option<Timestamp>,
    #[serde(default)]
    pub revoked: bool,
}

impl ApiKeyRecord {
    /// Returns `true` if the key has an expiry at or before `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires.is_some_and(|exp| !exp.is_after(&now))
    }
}

/// Source of truth for API keys and principals.
///
/// Implementations are shared across requests and must not cache mutable
/// state that could diverge from the backing registry.
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Find the key record indexed by `hash`.
    async fn lookup_by_hash(&self, hash: &str) -> RegistryResult<Option<ApiKeyRecord>>;

    /// Load principal `id` within `org`.
    async fn load_principal(&self, id: i64, org: OrgId) -> RegistryResult<Option<Principal>>;
}

/// Registry seeded from configuration and read-only afterwards.
#[derive(Debug, Default)]
pub struct InMemoryIdentityRegistry {
    keys: HashMap<String, ApiKeyRecord>,
    principals: HashMap<(OrgId, i64), Principal>,
}

impl InMemoryIdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let mut registry = Self::new();
        for principal in &config.principals {
            registry = registry.with_principal(principal.clone());
        }
        for key in &config.api_keys {
            registry = registry.with_key(key.clone());
        }
        registry
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principals
            .insert((principal.org_id, principal.id), principal);
        self
    }

    pub fn with_key(mut self, key: ApiKeyRecord) -> Self {
        self.keys.insert(key.hash.clone(), key);
        self
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

#[async_trait]
impl IdentityRegistry for InMemoryIdentityRegistry {
    async fn lookup_by_hash(&self, hash: &str) -> RegistryResult<Option<ApiKeyRecord>> {
        Ok(self.keys.get(hash).cloned())
    }

    async fn load_principal(&self, id: i64, org: OrgId) -> RegistryResult<Option<Principal>> {
        Ok(self.principals.get(&(org, id)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vos_types::Role;

    #[test]
    fn expiry_is_inclusive() {
        let mut key = ApiKeyRecord {
            id: 1,
            name: "ci".into(),
            org_id: OrgId(1),
            hash: "h".into(),
            service_account_id: Some(1),
            expires: Some(Timestamp::from_millis(1_000)),
            revoked: false,
        };
        assert!(!key.is_expired(Timestamp::from_millis(999)));
        assert!(key.is_expired(Timestamp::from_millis(1_000)));
        key.expires = None;
        assert!(!key.is_expired(Timestamp::from_millis(i64::MAX)));
    }

    #[tokio::test]
    async fn principals_are_scoped_by_org() {
        let registry = InMemoryIdentityRegistry::new().with_principal(Principal {
            id: 7,
            login: "sa-ci".into(),
            org_id: OrgId(2),
            role: Role::Admin,
            disabled: false,
            service_account: true,
        });
        assert!(registry.load_principal(7, OrgId(2)).await.unwrap().is_some());
        assert!(registry.load_principal(7, OrgId(1)).await.unwrap().is_none());
        assert!(registry.lookup_by_hash("nope").await.unwrap().is_none());
    }
}
