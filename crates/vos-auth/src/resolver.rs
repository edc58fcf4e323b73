use std::sync::Arc;

use vos_types::{Principal, Role, Timestamp};

use crate::error::ResolveError;
use crate::registry::IdentityRegistry;

/// Maps a credential lookup hash to a principal allowed to use the store.
///
/// Every call goes to the registry; nothing is cached between requests.
#[derive(Clone)]
pub struct IdentityResolver {
    registry: Arc<dyn IdentityRegistry>,
    required_role: Role,
}

impl IdentityResolver {
    pub fn new(registry: Arc<dyn IdentityRegistry>, required_role: Role) -> Self {
        Self {
            registry,
            required_role,
        }
    }

    pub fn required_role(&self) -> Role {
        self.required_role
    }

    /// Resolve `hash` against the registry as of now.
    pub async fn resolve(&self, hash: &str) -> Result<Principal, ResolveError> {
        self.resolve_at(hash, Timestamp::now()).await
    }

    /// Resolve `hash`, evaluating key expiry against `now`.
    pub async fn resolve_at(&self, hash: &str, now: Timestamp) -> Result<Principal, ResolveError> {
        let key = self
            .registry
            .lookup_by_hash(hash)
            .await?
            .ok_or_else(|| ResolveError::NotFound("no api key matches".into()))?;

        if key.revoked {
            return Err(ResolveError::PolicyViolation(format!("api key {} is revoked", key.id)));
        }
        if key.is_expired(now) {
            return Err(ResolveError::PolicyViolation(format!("api key {} has expired", key.id)));
        }
        let Some(account_id) = key.service_account_id else {
            return Err(ResolveError::PolicyViolation(format!(
                "api key {} has no service account",
                key.id
            )));
        };

        let principal = self
            .registry
            .load_principal(account_id, key.org_id)
            .await?
            .ok_or_else(|| {
                ResolveError::NotFound(format!("principal {account_id} in {}", key.org_id))
            })?;

        if principal.disabled {
            return Err(ResolveError::PolicyViolation(format!(
                "principal {} is disabled",
                principal.id
            )));
        }
        if !principal.has_role(self.required_role) {
            return Err(ResolveError::PolicyViolation(format!(
                "principal {} has role {}, {} required",
                principal.id, principal.role, self.required_role
            )));
        }
        Ok(principal)
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("required_role", &self.required_role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, FailingRegistry};
    use crate::RegistryError;

    #[tokio::test]
    async fn resolves_active_admin() {
        let f = fixture();
        let p = f.resolver.resolve(&f.hash).await.unwrap();
        assert_eq!(p.id, 1);
        assert_eq!(p.login, "fake");
    }

    #[tokio::test]
    async fn unknown_hash_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.resolver.resolve("0000").await,
            Err(ResolveError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn revoked_and_expired_keys_violate_policy() {
        let f = fixture();
        assert!(matches!(
            f.resolver.resolve(&f.revoked_hash).await,
            Err(ResolveError::PolicyViolation(_))
        ));
        assert!(f.resolver.resolve_at(&f.expiring_hash, Timestamp::from_millis(1_999)).await.is_ok());
        assert!(matches!(
            f.resolver.resolve_at(&f.expiring_hash, Timestamp::from_millis(2_000)).await,
            Err(ResolveError::PolicyViolation(_))
        ));
    }

    #[tokio::test]
    async fn principal_policy() {
        let f = fixture();
        for hash in [&f.disabled_hash, &f.viewer_hash, &f.no_account_hash] {
            let err = f.resolver.resolve(hash).await.unwrap_err();
            assert_eq!(err.reason(), "policy_violation", "{err}");
        }
    }

    #[tokio::test]
    async fn required_role_is_configurable() {
        let f = fixture();
        let lenient = IdentityResolver::new(f.registry.clone(), Role::Viewer);
        assert!(lenient.resolve(&f.viewer_hash).await.is_ok());
        assert!(lenient.resolve(&f.disabled_hash).await.is_err());
    }

    #[tokio::test]
    async fn registry_outage_is_distinct() {
        let resolver = IdentityResolver::new(Arc::new(FailingRegistry), Role::Admin);
        assert_eq!(
            resolver.resolve("any").await.unwrap_err(),
            ResolveError::Unavailable(RegistryError::Unavailable("down".into()))
        );
    }
}
