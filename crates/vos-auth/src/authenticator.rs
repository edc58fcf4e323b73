use vos_crypto::PrefixedKey;

use crate::context::AuthenticatedContext;
use crate::error::{AuthError, ResolveError};
use crate::metadata::{RequestMetadata, AUTHORIZATION};
use crate::resolver::IdentityResolver;

const BEARER_PREFIX: &str = "Bearer ";

/// Message returned for every credential that fails after header parsing.
pub const INVALID_TOKEN: &str = "invalid token";

/// Turns inbound request metadata into an [`AuthenticatedContext`].
///
/// Runs once per request and keeps no state between requests. The
/// `authorization` entry is removed from the metadata before anything else
/// happens, whatever the outcome. Every failure after header parsing is
/// reported as the same `Unauthenticated` message; the specific reason is
/// logged.
#[derive(Clone, Debug)]
pub struct Authenticator {
    resolver: IdentityResolver,
}

impl Authenticator {
    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    pub async fn authenticate(
        &self,
        mut metadata: RequestMetadata,
    ) -> Result<AuthenticatedContext, AuthError> {
        let values = metadata.remove(AUTHORIZATION);
        let header = match values.as_slice() {
            [] => {
                return Err(AuthError::unauthenticated(
                    "no authorization header provided",
                ))
            }
            [one] => one.as_str(),
            _ => {
                return Err(AuthError::unauthenticated(
                    "exactly one authorization header is required",
                ))
            }
        };

        let Some(token) = header.strip_prefix(BEARER_PREFIX) else {
            return Err(AuthError::unauthenticated(
                "authorization header must use the Bearer scheme",
            ));
        };
        if token.is_empty() {
            return Err(AuthError::unauthenticated("bearer token is empty"));
        }

        match self.resolve(token).await {
            Ok(principal) => {
                tracing::debug!(principal = %principal, "request authenticated");
                Ok(AuthenticatedContext::new(principal, metadata))
            }
            Err(e) => {
                tracing::warn!(reason = e.reason(), detail = %e, "rejected credential");
                Err(AuthError::unauthenticated(INVALID_TOKEN))
            }
        }
    }

    async fn resolve(&self, token: &str) -> Result<vos_types::Principal, ResolveError> {
        let key = PrefixedKey::decode(token)?;
        self.resolver.resolve(&key.lookup_hash()).await
    }
}
