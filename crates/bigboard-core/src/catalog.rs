//! Catalog of the custom sticker images behind each big board color.
//!
//! The five color images live as custom stickers on the automation account.
//! Pasting one onto a card needs its template id, and recognizing one already
//! on a card needs its image URL, so both are looked up once and kept for the
//! lifetime of the `Catalog`.

use crate::error::{BoardError, Result};
use crate::service::{BoardService, CustomSticker};
use crate::sticker::StickerColor;
use serde::Serialize;
use std::sync::{Mutex, OnceLock};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub color: StickerColor,
    pub template_id: String,
    pub image_url: String,
}

/// True when an attached sticker's image URL points at `filename`.
pub fn matches_image_ref(image_url: &str, filename: &str) -> bool {
    image_url.ends_with(filename)
}

/// Color entries resolved against the account's custom stickers.
///
/// Construct one at startup and share it (`Arc<Catalog>`). Population happens
/// on the first `ensure_populated` call and never again.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: OnceLock<Vec<CatalogEntry>>,
    populate_lock: Mutex<()>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog populated from an already-fetched sticker list.
    pub fn from_custom_stickers(stickers: &[CustomSticker]) -> Result<Self> {
        let catalog = Self::new();
        let entries = resolve_entries(stickers)?;
        let _ = catalog.entries.set(entries);
        Ok(catalog)
    }

    pub fn is_populated(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Resolve every color against the remote account, once.
    ///
    /// Fails with `CatalogIncomplete` when any color has no matching custom
    /// sticker; the catalog then stays unpopulated so nothing syncs against
    /// a partial mapping.
    pub fn ensure_populated(&self, service: &dyn BoardService) -> Result<()> {
        if self.is_populated() {
            return Ok(());
        }

        let _guard = self
            .populate_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.is_populated() {
            return Ok(());
        }

        let stickers = service.list_custom_stickers()?;
        let entries = resolve_entries(&stickers)?;
        tracing::info!(
            custom_stickers = stickers.len(),
            "populated sticker catalog"
        );
        let _ = self.entries.set(entries);
        Ok(())
    }

    pub fn entries(&self) -> Result<&[CatalogEntry]> {
        self.entries
            .get()
            .map(|v| v.as_slice())
            .ok_or(BoardError::CatalogNotPopulated)
    }

    pub fn resolve_by_color(&self, color: StickerColor) -> Option<&CatalogEntry> {
        self.entries.get()?.iter().find(|e| e.color == color)
    }

    pub fn resolve_by_letter(&self, letter: char) -> Option<&CatalogEntry> {
        self.resolve_by_color(StickerColor::from_letter(letter)?)
    }

    pub fn resolve_by_image_ref(&self, image_url: &str) -> Option<&CatalogEntry> {
        self.entries
            .get()?
            .iter()
            .find(|e| matches_image_ref(image_url, e.color.filename()))
    }
}

fn resolve_entries(stickers: &[CustomSticker]) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::with_capacity(StickerColor::all().len());
    let mut missing = Vec::new();

    for &color in StickerColor::all() {
        // Later uploads of the same image win.
        let found = stickers
            .iter()
            .rev()
            .find(|s| matches_image_ref(&s.url, color.filename()));
        match found {
            Some(s) => entries.push(CatalogEntry {
                color,
                template_id: s.id.clone(),
                image_url: s.url.clone(),
            }),
            None => missing.push(color.letter().to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(BoardError::CatalogIncomplete { missing });
    }
    Ok(entries)
}
