//! Shared fixture for this crate's tests.

use std::sync::Arc;

use async_trait::async_trait;
use vos_crypto::PrefixedKey;
use vos_types::{OrgId, Principal, Role, Timestamp};

use crate::authenticator::Authenticator;
use crate::error::{RegistryError, RegistryResult};
use crate::registry::{ApiKeyRecord, IdentityRegistry, InMemoryIdentityRegistry};
use crate::resolver::IdentityResolver;

pub struct Fixture {
    pub registry: Arc<dyn IdentityRegistry>,
    pub resolver: IdentityResolver,
    pub authenticator: Authenticator,
    pub token: String,
    pub hash: String,
    pub revoked_token: String,
    pub revoked_hash: String,
    pub expiring_hash: String,
    pub disabled_token: String,
    pub disabled_hash: String,
    pub viewer_token: String,
    pub viewer_hash: String,
    pub no_account_hash: String,
    pub unknown_token: String,
}

pub struct FailingRegistry;

#[async_trait]
impl IdentityRegistry for FailingRegistry {
    async fn lookup_by_hash(&self, _hash: &str) -> RegistryResult<Option<ApiKeyRecord>> {
        Err(RegistryError::Unavailable("down".into()))
    }

    async fn load_principal(&self, _id: i64, _org: OrgId) -> RegistryResult<Option<Principal>> {
        Err(RegistryError::Unavailable("down".into()))
    }
}

fn principal(id: i64, login: &str, role: Role, disabled: bool) -> Principal {
    Principal {
        id,
        login: login.into(),
        org_id: OrgId(1),
        role,
        disabled,
        service_account: true,
    }
}

fn key(id: i64, secret: &str, account: Option<i64>) -> (String, ApiKeyRecord) {
    let k = PrefixedKey::new("sa", secret).unwrap();
    let record = ApiKeyRecord {
        id,
        name: format!("key-{id}"),
        org_id: OrgId(1),
        hash: k.lookup_hash(),
        service_account_id: account,
        expires: None,
        revoked: false,
    };
    (k.to_token(), record)
}

pub fn fixture() -> Fixture {
    let (token, main) = key(10, "mainsecret", Some(1));
    let (revoked_token, mut revoked) = key(11, "revokedsecret", Some(1));
    revoked.revoked = true;
    let (_, mut expiring) = key(12, "expiringsecret", Some(1));
    expiring.expires = Some(Timestamp::from_millis(2_000));
    let (disabled_token, disabled) = key(13, "disabledsecret", Some(2));
    let (viewer_token, viewer) = key(14, "viewersecret", Some(3));
    let (_, no_account) = key(15, "orphansecret", None);
    let (unknown_token, _) = key(16, "unknownsecret", Some(1));

    let hash = main.hash.clone();
    let revoked_hash = revoked.hash.clone();
    let expiring_hash = expiring.hash.clone();
    let disabled_hash = disabled.hash.clone();
    let viewer_hash = viewer.hash.clone();
    let no_account_hash = no_account.hash.clone();

    let registry: Arc<dyn IdentityRegistry> = Arc::new(
        InMemoryIdentityRegistry::new()
            .with_principal(principal(1, "fake", Role::Admin, false))
            .with_principal(principal(2, "off", Role::Admin, true))
            .with_principal(principal(3, "reader", Role::Viewer, false))
            .with_key(main)
            .with_key(revoked)
            .with_key(expiring)
            .with_key(disabled)
            .with_key(viewer)
            .with_key(no_account),
    );
    let resolver = IdentityResolver::new(Arc::clone(&registry), Role::Admin);
    let authenticator = Authenticator::new(resolver.clone());

    Fixture {
        registry,
        resolver,
        authenticator,
        token,
        hash,
        revoked_token,
        revoked_hash,
        expiring_hash,
        disabled_token,
        disabled_hash,
        viewer_token,
        viewer_hash,
        no_account_hash,
        unknown_token,
    }
}
