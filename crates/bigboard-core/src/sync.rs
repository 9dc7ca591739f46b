//! Entry points that fetch cards and hand them to the `Reconciler`.

use crate::error::Result;
use crate::reconcile::{Reconciler, SyncOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fetch one card and reconcile its stickers.
pub fn sync_one(reconciler: &Reconciler, card_id: &str) -> Result<SyncOutcome> {
    let card = reconciler.service().get_card(card_id)?;
    reconciler.sync(&card)
}

#[derive(Debug, Clone, Serialize)]
pub struct CardFailure {
    pub card_id: String,
    pub card_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub board_id: String,
    pub updated: usize,
    pub in_sync: usize,
    pub failures: Vec<CardFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.updated + self.in_sync + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reconcile every card on a board, in listing order.
///
/// A failing card is logged and recorded; the rest of the board still syncs.
/// Only a failure to list the board is returned as an error.
pub fn sync_all(reconciler: &Reconciler, board_id: &str) -> Result<BatchReport> {
    let started_at = Utc::now();
    // An incomplete catalog aborts the batch before any card is listed.
    reconciler.catalog().ensure_populated(reconciler.service())?;
    let cards = reconciler.service().get_board_cards(board_id)?;
    tracing::info!(board_id, cards = cards.len(), "syncing board stickers");

    let mut report = BatchReport {
        board_id: board_id.to_string(),
        updated: 0,
        in_sync: 0,
        failures: Vec::new(),
        started_at,
        finished_at: started_at,
    };

    for card in &cards {
        match reconciler.sync(card) {
            Ok(SyncOutcome::InSync) => report.in_sync += 1,
            Ok(SyncOutcome::Updated { .. }) => report.updated += 1,
            Err(e) => {
                tracing::warn!(card_id = %card.id, card = %card.name, error = %e, "sticker sync failed");
                report.failures.push(CardFailure {
                    card_id: card.id.clone(),
                    card_name: card.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    report.finished_at = Utc::now();
    tracing::info!(
        board_id,
        updated = report.updated,
        in_sync = report.in_sync,
        failed = report.failures.len(),
        "board sync finished"
    );
    Ok(report)
}
