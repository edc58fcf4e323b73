//! The versioned object store service.
//!
//! [`ObjectStoreService`] is the public Read / Write / Delete / List / History
//! surface. It validates requests, applies the version chain rules in
//! [`chain`], derives summaries through a [`vos_summary::SummaryRegistry`],
//! and delegates durable, conditional persistence to a
//! [`vos_store::ObjectStore`]. Every call takes the request's
//! [`vos_auth::AuthenticatedContext`]; the caller's identity is never taken
//! from the request body.

pub mod chain;
pub mod config;
pub mod error;
pub mod service;

pub use chain::AuditFields;
pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use service::ObjectStoreService;
