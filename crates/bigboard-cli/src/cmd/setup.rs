use super::{load_config, trello};
use bigboard_core::catalog::Catalog;
use bigboard_core::setup::run_setup;
use std::path::Path;
use std::sync::Arc;

pub fn run(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let service = trello(&config)?;

    let report = run_setup(
        service,
        Arc::new(Catalog::new()),
        &config,
        config.trello.token.as_deref(),
    )?;

    super::sync::finish_report(&report, json)
}
