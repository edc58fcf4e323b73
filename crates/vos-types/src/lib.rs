//! Foundation types for the versioned object store (VOS).
//!
//! This crate provides the data model shared by every other VOS crate: the
//! identity of a stored object, its version token, the audit stamps attached
//! to each version, the authenticated principal that produced them, and the
//! per-kind summary derived from a body.
//!
//! # Key Types
//!
//! - [`ObjectKey`]: `(kind, uid)` pair identifying an object within an org
//! - [`Version`]: Opaque, never-reused version token
//! - [`Timestamp`]: Millisecond wall-clock instant used for audit stamps
//! - [`Principal`]: Resolved, authenticated identity
//! - [`UserInfo`]: The `(id, login)` projection recorded as `createdBy`/`modifiedBy`
//! - [`ObjectMeta`] / [`RawObject`]: A stored version with or without its body
//! - [`Summary`]: Best-effort projection of a body used for listing
//! - [`ContentHash`]: BLAKE3 digest of a body (the object's etag)

pub mod encoding;
pub mod error;
pub mod hash;
pub mod identity;
pub mod names;
pub mod object;
pub mod record;
pub mod summary;
pub mod temporal;
pub mod version;

pub use error::TypeError;
pub use hash::ContentHash;
pub use identity::{OrgId, Principal, Role, UserInfo};
pub use names::{validate_kind, validate_uid};
pub use object::ObjectKey;
pub use record::{ObjectMeta, RawObject};
pub use summary::{ObjectReference, Summary};
pub use temporal::Timestamp;
pub use version::Version;
