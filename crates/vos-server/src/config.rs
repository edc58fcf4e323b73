use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vos_auth::AuthConfig;
use vos_service::ServiceConfig;

use crate::error::{ServerError, ServerResult};

/// Where object versions are persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Process memory; everything is lost on exit.
    #[default]
    Memory,
    /// A SQLite database file, created and migrated on startup.
    Sqlite { path: PathBuf },
}

impl StorageConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Largest accepted request body, before base64 decoding.
    pub max_request_bytes: usize,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub storage: StorageConfig,
    pub service: ServiceConfig,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3010)),
            max_request_bytes: 16 * 1024 * 1024,
            log_filter: "info".into(),
            storage: StorageConfig::default(),
            service: ServiceConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse and validate a TOML document. Missing fields take defaults.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| ServerError::Config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Every inconsistency in the configuration. Empty means valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.max_request_bytes == 0 {
            problems.push("max_request_bytes must be greater than zero".to_string());
        } else if self.max_request_bytes < self.service.max_body_bytes {
            problems.push(format!(
                "max_request_bytes ({}) is below service.max_body_bytes ({})",
                self.max_request_bytes, self.service.max_body_bytes
            ));
        }
        if self.log_filter.trim().is_empty() {
            problems.push("log_filter must not be empty".to_string());
        }
        if let StorageConfig::Sqlite { path } = &self.storage {
            if path.as_os_str().is_empty() {
                problems.push("storage.path must not be empty".to_string());
            }
        }
        problems.extend(self.service.problems());
        problems.extend(self.auth.problems().into_iter().map(|p| format!("auth: {p}")));
        problems
    }

    pub fn validate(&self) -> ServerResult<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ServerError::Config(problems.join("; ")))
        }
    }
}
