//! Prefixed API-key credentials.
//!
//! A key travels as `vos<service>_<secret>_<checksum>`:
//!
//! - `vos` is the fixed structural prefix
//! - `<service>` is a short lowercase tag naming the issuing service
//!   (`sa` for service accounts)
//! - `<secret>` is the ASCII-alphanumeric secret material
//! - `<checksum>` is the 8-digit lowercase hex CRC-32 of
//!   `vos<service>_<secret>`, catching truncated or mistyped keys before
//!   any registry lookup happens
//!
//! The registry never stores the secret. It is indexed by
//! [`PrefixedKey::lookup_hash`], a BLAKE3 derive-key hash of the secret
//! salted with the checksum.

use std::fmt;

use thiserror::Error;

/// Fixed structural prefix of every key.
pub const KEY_PREFIX: &str = "vos";

const LOOKUP_CONTEXT: &str = "vos api-key lookup v1";

/// Why a token failed to decode. All variants are a malformed credential.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("malformed credential: missing {KEY_PREFIX:?} prefix")]
    MissingPrefix,

    #[error("malformed credential: expected 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("malformed credential: invalid service tag")]
    InvalidServiceId,

    #[error("malformed credential: invalid secret")]
    InvalidSecret,

    #[error("malformed credential: checksum mismatch")]
    ChecksumMismatch,
}

/// A decoded API key.
///
/// `Debug` redacts the secret; use [`Self::to_token`] only when the token
/// itself must be handed to a client.
#[derive(Clone, PartialEq, Eq)]
pub struct PrefixedKey {
    service_id: String,
    secret: String,
    checksum: String,
}

impl PrefixedKey {
    /// Assemble a key from its parts, computing the checksum.
    pub fn new(service_id: &str, secret: &str) -> Result<Self, CredentialError> {
        validate_service_id(service_id)?;
        validate_secret(secret)?;
        let checksum = checksum(service_id, secret);
        Ok(Self {
            service_id: service_id.to_string(),
            secret: secret.to_string(),
            checksum,
        })
    }

    /// Decode a token, verifying structure and checksum.
    pub fn decode(token: &str) -> Result<Self, CredentialError> {
        if !token.starts_with(KEY_PREFIX) {
            return Err(CredentialError::MissingPrefix);
        }
        let parts: Vec<&str> = token.split('_').collect();
        if parts.len() != 3 {
            return Err(CredentialError::SegmentCount(parts.len()));
        }
        let service_id = &parts[0][KEY_PREFIX.len()..];
        validate_service_id(service_id)?;
        validate_secret(parts[1])?;

        let expected = checksum(service_id, parts[1]);
        if parts[2] != expected {
            return Err(CredentialError::ChecksumMismatch);
        }
        Ok(Self {
            service_id: service_id.to_string(),
            secret: parts[1].to_string(),
            checksum: expected,
        })
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// The one-way hash the key registry is indexed by.
    ///
    /// Deterministic for a given key; not invertible to the secret.
    pub fn lookup_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new_derive_key(LOOKUP_CONTEXT);
        hasher.update(self.checksum.as_bytes());
        hasher.update(b":");
        hasher.update(self.secret.as_bytes());
        hex::encode(hasher.finalize().as_bytes())
    }

    /// The full token text, including the secret.
    pub fn to_token(&self) -> String {
        format!(
            "{KEY_PREFIX}{}_{}_{}",
            self.service_id, self.secret, self.checksum
        )
    }
}

impl fmt::Debug for PrefixedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixedKey")
            .field("service_id", &self.service_id)
            .field("secret", &"<redacted>")
            .field("checksum", &self.checksum)
            .finish()
    }
}

fn checksum(service_id: &str, secret: &str) -> String {
    let body = format!("{KEY_PREFIX}{service_id}_{secret}");
    format!("{:08x}", crc32fast::hash(body.as_bytes()))
}

fn validate_service_id(service_id: &str) -> Result<(), CredentialError> {
    let ok = !service_id.is_empty()
        && service_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(CredentialError::InvalidServiceId)
    }
}

fn validate_secret(secret: &str) -> Result<(), CredentialError> {
    if !secret.is_empty() && secret.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(CredentialError::InvalidSecret)
    }
}
