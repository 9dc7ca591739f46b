//! One-time bootstrap: webhook registration, catalog population, and a full
//! sticker sync of the primary board.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::reconcile::Reconciler;
use crate::service::BoardService;
use crate::sync::{sync_all, BatchReport};
use crate::webhook::register_board_webhook;
use std::sync::Arc;

/// Bring the primary board under management.
///
/// `token` is the API token whose webhooks are replaced. Catalog population
/// runs before any card is touched; an incomplete catalog aborts setup.
pub fn run_setup(
    service: Arc<dyn BoardService>,
    catalog: Arc<Catalog>,
    config: &Config,
    token: Option<&str>,
) -> Result<BatchReport> {
    let board_id = config.primary_board_id()?;

    match (&config.webhook.callback_url, token) {
        (Some(callback_url), Some(token)) => {
            register_board_webhook(
                service.as_ref(),
                token,
                board_id,
                callback_url,
                &config.webhook.description,
            )?;
        }
        (Some(_), None) => return Err(BoardError::MissingCredentials),
        (None, _) => {
            tracing::warn!("webhook.callback_url unset; skipping webhook registration");
        }
    }

    catalog.ensure_populated(service.as_ref())?;

    let reconciler = Reconciler::new(service, catalog, config.layout.clone());
    sync_all(&reconciler, board_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{full_custom_stickers, MemoryBoard};

    fn config() -> Config {
        let mut cfg = Config::default();
        cfg.boards.insert("big_board".into(), "big".into());
        cfg.webhook.callback_url = Some("https://bb.example/webhook/update_board".into());
        cfg
    }

    #[test]
    fn setup_registers_webhook_and_syncs_board() {
        let board = Arc::new(MemoryBoard::with_custom_stickers(full_custom_stickers()));
        board.insert_webhook("stale", "https://old.example/hook");
        board.insert_card("big", "c1", "One", "||GP||");
        board.insert_card("big", "c2", "Two", "");

        let report = run_setup(board.clone(), Arc::new(Catalog::new()), &config(), Some("tok"))
            .unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.in_sync, 1);
        let hooks = board.webhooks();
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0].id_model, "big");
        assert_eq!(hooks[0].description, "big board sticker sync");
    }

    #[test]
    fn incomplete_catalog_aborts_before_syncing() {
        let mut stickers = full_custom_stickers();
        stickers.pop();
        let board = Arc::new(MemoryBoard::with_custom_stickers(stickers));
        board.insert_card("big", "c1", "One", "||GP||");

        let err = run_setup(board.clone(), Arc::new(Catalog::new()), &config(), Some("tok"))
            .unwrap_err();

        assert!(matches!(err, BoardError::CatalogIncomplete { .. }));
        assert_eq!(board.sticker_adds(), 0);
    }

    #[test]
    fn unknown_primary_board_is_configuration_error() {
        let board = Arc::new(MemoryBoard::with_custom_stickers(full_custom_stickers()));
        let err = run_setup(board, Arc::new(Catalog::new()), &Config::default(), Some("tok"))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn no_callback_url_skips_registration() {
        let board = Arc::new(MemoryBoard::with_custom_stickers(full_custom_stickers()));
        board.insert_webhook("stale", "https://old.example/hook");
        let mut cfg = config();
        cfg.webhook.callback_url = None;

        run_setup(board.clone(), Arc::new(Catalog::new()), &cfg, None).unwrap();
        assert_eq!(board.webhooks().len(), 1);
        assert_eq!(board.webhooks()[0].id_model, "stale");
    }
}
