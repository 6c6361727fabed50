use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::Repositories;

/// Shared by every handler for the life of the process.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
}

impl AppState {
    pub fn new(config: AppConfig, repos: Repositories) -> Self {
        Self {
            config: Arc::new(config),
            repos,
        }
    }
}
