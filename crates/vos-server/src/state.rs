use std::sync::Arc;

use vos_auth::Authenticator;
use vos_service::ObjectStoreService;

/// Process-wide state shared by every request. Built once at startup and
/// read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ObjectStoreService>,
    pub authenticator: Arc<Authenticator>,
    /// Storage backend name reported by `/v1/info`.
    pub storage: &'static str,
}

impl AppState {
    pub fn new(service: ObjectStoreService, authenticator: Authenticator, storage: &'static str) -> Self {
        Self {
            service: Arc::new(service),
            authenticator: Arc::new(authenticator),
            storage,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}
