//! Cryptographic primitives for the versioned object store.
//!
//! Provides the API-key credential codec (decode a prefixed token, derive the
//! one-way hash the key registry is indexed by) and domain-separated BLAKE3
//! hashing of object bodies.
//!
//! Everything here is pure: no I/O, no shared state. All crypto operations
//! wrap established libraries; no custom cryptography.

pub mod credential;
pub mod hasher;

pub use credential::{CredentialError, PrefixedKey, KEY_PREFIX};
pub use hasher::ContentHasher;
