//! Request authentication for the versioned object store.
//!
//! Every request carries one `authorization: Bearer <token>` entry. The
//! [`Authenticator`] strips it, decodes the token with the credential codec,
//! and asks the [`IdentityResolver`] to map the token's lookup hash to a
//! [`vos_types::Principal`] through an [`IdentityRegistry`]. Success yields an
//! [`AuthenticatedContext`] that downstream code reads the caller from.
//!
//! Resolution failures (malformed token, unknown key, revoked or expired key,
//! disabled or under-privileged principal, registry outage) all surface as
//! one opaque [`AuthError::Unauthenticated`].

pub mod authenticator;
pub mod config;
pub mod context;
pub mod error;
pub mod metadata;
pub mod registry;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use authenticator::{Authenticator, INVALID_TOKEN};
pub use config::AuthConfig;
pub use context::AuthenticatedContext;
pub use error::{AuthError, AuthResult, RegistryError, RegistryResult, ResolveError};
pub use metadata::{RequestMetadata, AUTHORIZATION};
pub use registry::{ApiKeyRecord, IdentityRegistry, InMemoryIdentityRegistry};
pub use resolver::IdentityResolver;
