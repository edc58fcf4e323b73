use std::sync::Arc;

use tokio::net::TcpListener;
use vos_auth::{Authenticator, IdentityRegistry, IdentityResolver, InMemoryIdentityRegistry};
use vos_service::ObjectStoreService;
use vos_store::{InMemoryObjectStore, ObjectStore, SqliteObjectStore};
use vos_summary::SummaryRegistry;

use crate::config::{ServerConfig, StorageConfig};
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Versioned object store server.
pub struct VosServer {
    config: ServerConfig,
    state: AppState,
}

impl VosServer {
    /// Validate the configuration and wire the store, the identity registry
    /// seeded from `config.auth`, and the built-in summary extractors.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let store: Arc<dyn ObjectStore> = match &config.storage {
            StorageConfig::Memory => Arc::new(InMemoryObjectStore::new()),
            StorageConfig::Sqlite { path } => Arc::new(SqliteObjectStore::open(path)?),
        };
        let registry = Arc::new(InMemoryIdentityRegistry::from_config(&config.auth));
        tracing::info!(
            storage = config.storage.name(),
            principals = config.auth.principals.len(),
            api_keys = registry.key_count(),
            "server configured"
        );
        Ok(Self::with_parts(config, store, registry))
    }

    /// Assemble a server around existing collaborators.
    pub fn with_parts(
        config: ServerConfig,
        store: Arc<dyn ObjectStore>,
        registry: Arc<dyn IdentityRegistry>,
    ) -> Self {
        let resolver = IdentityResolver::new(registry, config.auth.required_role);
        let service = ObjectStoreService::new(
            store,
            Arc::new(SummaryRegistry::with_builtin()),
            config.service.clone(),
        );
        let state = AppState::new(service, Authenticator::new(resolver), config.storage.name());
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), self.config.max_request_bytes)
    }

    /// Serve requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("vos server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("vos server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
