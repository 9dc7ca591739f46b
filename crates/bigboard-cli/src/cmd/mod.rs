pub mod config;
pub mod propose;
pub mod serve;
pub mod setup;
pub mod stickers;
pub mod sync;
pub mod webhooks;

use anyhow::Context;
use bigboard_core::config::Config;
use bigboard_core::service::BoardService;
use bigboard_core::trello::TrelloClient;
use std::path::Path;
use std::sync::Arc;

/// Load the resolved config file with credentials layered from the environment.
pub(crate) fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = crate::root::resolve_config(explicit)?;
    Config::load_with_env(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

pub(crate) fn trello(config: &Config) -> anyhow::Result<Arc<dyn BoardService>> {
    let client = TrelloClient::from_config(&config.trello)?;
    Ok(Arc::new(client))
}
