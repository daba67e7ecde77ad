use std::sync::Arc;

use crate::backend::{BackendClient, BackendResult, NavigationApi};
use crate::config::AppConfig;
use crate::session::SessionRegistry;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<BackendClient>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig) -> BackendResult<Self> {
        let backend = Arc::new(BackendClient::from_config(&config.backend)?);
        Ok(Self::with_navigation(config, backend.clone(), backend))
    }

    /// Navigation calls (menu fetch, access checks) may go to a different
    /// implementation than CRUD calls
    pub fn with_navigation(
        config: AppConfig,
        backend: Arc<BackendClient>,
        navigation: Arc<dyn NavigationApi>,
    ) -> Self {
        let sessions = Arc::new(SessionRegistry::new(navigation, &config));
        Self {
            config: Arc::new(config),
            backend,
            sessions,
        }
    }
}
