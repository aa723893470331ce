use std::sync::Arc;

use farmwise_llm::GenerativeClient;
use farmwise_persist::SessionStore;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for efficient sharing across async tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn SessionStore>,
    pub llm: Arc<dyn GenerativeClient>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn SessionStore>,
        llm: Arc<dyn GenerativeClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            llm,
        }
    }
}
