//! Reconcile a card's stickers with the marker in its description.
//!
//! A card out of sync is reset rather than patched: every attached sticker is
//! removed and the desired row is pasted from scratch. A sync interrupted
//! midway leaves the card cleared or partially rebuilt, which the next sync
//! still sees as out of sync and rebuilds in full.

use crate::catalog::Catalog;
use crate::error::{BoardError, Result};
use crate::layout::{placements, LayoutConfig};
use crate::service::{BoardService, Card};
use crate::sticker::{extract_code, to_code_string, StickerColor};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

/// Stickers currently on a card, as catalog colors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActualState {
    pub colors: Vec<StickerColor>,
    /// Attached stickers that match no catalog entry.
    pub foreign: usize,
}

pub fn actual_state(catalog: &Catalog, card: &Card) -> ActualState {
    let mut state = ActualState::default();
    for sticker in &card.stickers {
        match catalog.resolve_by_image_ref(&sticker.image_url) {
            Some(entry) => state.colors.push(entry.color),
            None => state.foreign += 1,
        }
    }
    state
}

/// True when the card's stickers differ from its description marker.
///
/// Order matters: the same colors in a different order are out of sync. Any
/// sticker outside the catalog also forces a sync so it gets cleared.
pub fn needs_sync(catalog: &Catalog, card: &Card) -> bool {
    let actual = actual_state(catalog, card);
    actual.foreign > 0 || actual.colors != extract_code(&card.desc)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    InSync,
    Updated { removed: usize, added: usize },
}

pub struct Reconciler {
    service: Arc<dyn BoardService>,
    catalog: Arc<Catalog>,
    layout: LayoutConfig,
}

impl Reconciler {
    pub fn new(
        service: Arc<dyn BoardService>,
        catalog: Arc<Catalog>,
        layout: LayoutConfig,
    ) -> Self {
        Self {
            service,
            catalog,
            layout,
        }
    }

    pub fn service(&self) -> &dyn BoardService {
        self.service.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sync(&self, card: &Card) -> Result<SyncOutcome> {
        self.sync_with_rng(card, &mut rand::thread_rng())
    }

    /// `sync` with an explicit source of sticker rotation.
    pub fn sync_with_rng<R: Rng + ?Sized>(&self, card: &Card, rng: &mut R) -> Result<SyncOutcome> {
        self.catalog.ensure_populated(self.service.as_ref())?;

        if !needs_sync(&self.catalog, card) {
            tracing::info!(card_id = %card.id, card = %card.name, "stickers already in sync");
            return Ok(SyncOutcome::InSync);
        }

        let desired = extract_code(&card.desc);
        tracing::info!(
            card_id = %card.id,
            card = %card.name,
            code = %to_code_string(&desired),
            attached = card.stickers.len(),
            "updating stickers"
        );

        for sticker in &card.stickers {
            self.service.remove_sticker(&card.id, &sticker.id)?;
        }

        let row = placements(desired.len(), &self.layout, rng);
        for (color, placement) in desired.iter().zip(row) {
            let entry = self
                .catalog
                .resolve_by_color(*color)
                .ok_or(BoardError::CatalogNotPopulated)?;
            self.service
                .add_sticker(&card.id, &entry.template_id, placement)?;
        }

        Ok(SyncOutcome::Updated {
            removed: card.stickers.len(),
            added: desired.len(),
        })
    }
}
