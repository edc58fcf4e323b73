use serde::{Deserialize, Serialize};

/// HTTP endpoint paths.
pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
    pub const OBJECT_READ: &str = "/v1/object/read";
    pub const OBJECT_WRITE: &str = "/v1/object/write";
    pub const OBJECT_DELETE: &str = "/v1/object/delete";
    pub const OBJECT_LIST: &str = "/v1/object/list";
    pub const OBJECT_HISTORY: &str = "/v1/object/history";
}

/// Health check response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}

/// Static description of a running server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub protocol_version: u32,
    /// `memory` or `sqlite`.
    pub storage: String,
    /// Kinds with a dedicated summary extractor.
    pub summary_kinds: Vec<String>,
}
