//! Wire protocol for the versioned object store.
//!
//! Defines the request/response messages of the object RPC surface (Read,
//! Write, Delete, List, History), the stable [`ErrorKind`] every failure maps
//! to, and the HTTP endpoint paths. Transport-agnostic: the types are plain
//! serde structs carried as JSON by the server.

pub mod endpoint;
pub mod error;
pub mod message;

pub use endpoint::{endpoints, HealthResponse, InfoResponse};
pub use error::{ErrorBody, ErrorKind};
pub use message::{
    DeleteRequest, DeleteResponse, HistoryRequest, HistoryResponse, ListFilter, ListItem,
    ListRequest, ListResponse, ReadRequest, ReadResponse, VersionInfo, WriteRequest,
    WriteResponse, WriteStatus, PROTOCOL_VERSION,
};
