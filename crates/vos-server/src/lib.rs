//! HTTP/JSON transport for the versioned object store.
//!
//! Serves the Read / Write / Delete / List / History operations as
//! `POST /v1/object/*` routes behind bearer-token authentication, plus open
//! health and info endpoints.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, StorageConfig};
pub use error::{ApiError, ServerError, ServerResult};
pub use server::VosServer;
pub use state::AppState;
