use bigboard_core::catalog::Catalog;
use bigboard_core::config::Config;
use bigboard_core::reconcile::Reconciler;
use bigboard_core::service::BoardService;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<dyn BoardService>,
    /// Populated on first use and shared by every request.
    pub catalog: Arc<Catalog>,
    /// Token whose webhooks `/setup` replaces.
    pub token: Option<String>,
}

impl AppState {
    pub fn new(config: Config, service: Arc<dyn BoardService>) -> Self {
        let token = config.trello.token.clone();
        Self {
            config: Arc::new(config),
            service,
            catalog: Arc::new(Catalog::new()),
            token,
        }
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(
            Arc::clone(&self.service),
            Arc::clone(&self.catalog),
            self.config.layout.clone(),
        )
    }
}
