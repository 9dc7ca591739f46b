//! In-process `BoardService` holding boards, cards, and webhooks in memory.
//!
//! Used by tests across the workspace. Failures can be injected to exercise
//! the interrupted-sync paths.

use crate::error::{BoardError, Result};
use crate::service::{
    BoardList, BoardService, Card, CustomSticker, Placement, Sticker, Webhook,
};
use crate::sticker::StickerColor;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Custom stickers covering every color, hosted under a fake account URL.
pub fn full_custom_stickers() -> Vec<CustomSticker> {
    StickerColor::all()
        .iter()
        .map(|c| CustomSticker {
            id: format!("tmpl-{}", c.letter().to_ascii_lowercase()),
            url: format!("https://trello-stickers.example/acct/{}", c.filename()),
        })
        .collect()
}

#[derive(Debug, Default)]
struct Inner {
    custom_stickers: Vec<CustomSticker>,
    /// (board id, card)
    cards: Vec<(String, Card)>,
    /// (board id, list)
    lists: Vec<(String, BoardList)>,
    webhooks: Vec<Webhook>,
    next_id: u64,
    custom_sticker_fetches: usize,
    sticker_adds: usize,
    sticker_removals: usize,
    /// Sticker adds allowed before every further add fails.
    fail_add_after: Option<usize>,
    failing_cards: HashSet<String>,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn card_mut(&mut self, card_id: &str) -> Result<&mut Card> {
        self.cards
            .iter_mut()
            .map(|(_, c)| c)
            .find(|c| c.id == card_id)
            .ok_or_else(|| BoardError::CardNotFound(card_id.to_string()))
    }

    fn check_card(&self, card_id: &str) -> Result<()> {
        if self.failing_cards.contains(card_id) {
            return Err(injected(format!("card {card_id} unavailable")));
        }
        Ok(())
    }
}

fn injected(body: String) -> BoardError {
    BoardError::Api { status: 500, body }
}

#[derive(Debug, Default)]
pub struct MemoryBoard {
    inner: Mutex<Inner>,
}

impl MemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom_stickers(stickers: Vec<CustomSticker>) -> Self {
        let board = Self::new();
        board.set_custom_stickers(stickers);
        board
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn set_custom_stickers(&self, stickers: Vec<CustomSticker>) {
        self.lock().custom_stickers = stickers;
    }

    pub fn insert_card(&self, board_id: &str, card_id: &str, name: &str, desc: &str) {
        self.lock().cards.push((
            board_id.to_string(),
            Card {
                id: card_id.to_string(),
                name: name.to_string(),
                desc: desc.to_string(),
                url: Some(format!("https://trello.example/c/{card_id}")),
                stickers: Vec::new(),
            },
        ));
    }

    pub fn insert_list(&self, board_id: &str, list_id: &str, name: &str) {
        self.lock().lists.push((
            board_id.to_string(),
            BoardList {
                id: list_id.to_string(),
                name: name.to_string(),
            },
        ));
    }

    pub fn set_description(&self, card_id: &str, desc: &str) {
        if let Ok(card) = self.lock().card_mut(card_id) {
            card.desc = desc.to_string();
        }
    }

    /// Attach a sticker outside the catalog, e.g. one of Trello's stock stickers.
    pub fn attach_raw_sticker(&self, card_id: &str, image_url: &str) {
        let mut inner = self.lock();
        let id = inner.next_id("sticker");
        if let Ok(card) = inner.card_mut(card_id) {
            card.stickers.push(Sticker {
                id,
                image: "stock".to_string(),
                image_url: image_url.to_string(),
                top: 0.0,
                left: 0.0,
                z_index: card.stickers.len() as i64,
                rotate: 0.0,
            });
        }
    }

    /// Let `n` more sticker adds succeed, then fail every add.
    pub fn fail_sticker_add_after(&self, n: usize) {
        let mut inner = self.lock();
        inner.fail_add_after = Some(inner.sticker_adds + n);
    }

    /// Fail every read or write touching `id`, a card or a whole board.
    pub fn fail_card(&self, id: &str) {
        self.lock().failing_cards.insert(id.to_string());
    }

    pub fn clear_failures(&self) {
        let mut inner = self.lock();
        inner.fail_add_after = None;
        inner.failing_cards.clear();
    }

    pub fn custom_sticker_fetches(&self) -> usize {
        self.lock().custom_sticker_fetches
    }

    pub fn sticker_adds(&self) -> usize {
        self.lock().sticker_adds
    }

    pub fn sticker_removals(&self) -> usize {
        self.lock().sticker_removals
    }

    pub fn webhooks(&self) -> Vec<Webhook> {
        self.lock().webhooks.clone()
    }

    pub fn insert_webhook(&self, model_id: &str, callback_url: &str) {
        let mut inner = self.lock();
        let id = inner.next_id("webhook");
        inner.webhooks.push(Webhook {
            id,
            id_model: model_id.to_string(),
            callback_url: callback_url.to_string(),
            description: String::new(),
            active: true,
        });
    }

    pub fn cards_on_list(&self, list_id: &str) -> Vec<Card> {
        // Cards created through `add_card` are stored under their list id.
        self.lock()
            .cards
            .iter()
            .filter(|(owner, _)| owner == list_id)
            .map(|(_, c)| c.clone())
            .collect()
    }
}

impl BoardService for MemoryBoard {
    fn get_board_cards(&self, board_id: &str) -> Result<Vec<Card>> {
        let inner = self.lock();
        if inner.failing_cards.contains(board_id) {
            return Err(injected(format!("board {board_id} unavailable")));
        }
        Ok(inner
            .cards
            .iter()
            .filter(|(owner, _)| owner == board_id)
            .map(|(_, c)| c.clone())
            .collect())
    }

    fn get_card(&self, card_id: &str) -> Result<Card> {
        let mut inner = self.lock();
        inner.check_card(card_id)?;
        inner.card_mut(card_id).map(|c| c.clone())
    }

    fn list_custom_stickers(&self) -> Result<Vec<CustomSticker>> {
        let mut inner = self.lock();
        inner.custom_sticker_fetches += 1;
        Ok(inner.custom_stickers.clone())
    }

    fn add_sticker(
        &self,
        card_id: &str,
        template_id: &str,
        placement: Placement,
    ) -> Result<Sticker> {
        let mut inner = self.lock();
        inner.check_card(card_id)?;
        if let Some(limit) = inner.fail_add_after {
            if inner.sticker_adds >= limit {
                return Err(injected("sticker add failed".to_string()));
            }
        }
        let image_url = inner
            .custom_stickers
            .iter()
            .find(|s| s.id == template_id)
            .map(|s| s.url.clone())
            .ok_or_else(|| BoardError::Api {
                status: 400,
                body: format!("invalid value for image: {template_id}"),
            })?;
        let id = inner.next_id("sticker");
        let sticker = Sticker {
            id,
            image: template_id.to_string(),
            image_url,
            top: placement.top,
            left: placement.left,
            z_index: placement.z_index,
            rotate: placement.rotate as f64,
        };
        inner.card_mut(card_id)?.stickers.push(sticker.clone());
        inner.sticker_adds += 1;
        Ok(sticker)
    }

    fn remove_sticker(&self, card_id: &str, sticker_id: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.check_card(card_id)?;
        let card = inner.card_mut(card_id)?;
        let before = card.stickers.len();
        card.stickers.retain(|s| s.id != sticker_id);
        if card.stickers.len() == before {
            return Err(BoardError::Api {
                status: 404,
                body: format!("sticker not found: {sticker_id}"),
            });
        }
        inner.sticker_removals += 1;
        Ok(())
    }

    fn list_webhooks(&self, _token: &str) -> Result<Vec<Webhook>> {
        Ok(self.lock().webhooks.clone())
    }

    fn add_webhook(&self, model_id: &str, callback_url: &str, description: &str) -> Result<Webhook> {
        let mut inner = self.lock();
        if inner
            .webhooks
            .iter()
            .any(|w| w.id_model == model_id && w.callback_url == callback_url)
        {
            return Err(BoardError::Api {
                status: 400,
                body: "A webhook with that callback, model, and token already exists".into(),
            });
        }
        let id = inner.next_id("webhook");
        let hook = Webhook {
            id,
            id_model: model_id.to_string(),
            callback_url: callback_url.to_string(),
            description: description.to_string(),
            active: true,
        };
        inner.webhooks.push(hook.clone());
        Ok(hook)
    }

    fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        let mut inner = self.lock();
        let before = inner.webhooks.len();
        inner.webhooks.retain(|w| w.id != webhook_id);
        if inner.webhooks.len() == before {
            return Err(BoardError::Api {
                status: 404,
                body: format!("webhook not found: {webhook_id}"),
            });
        }
        Ok(())
    }

    fn get_board_lists(&self, board_id: &str) -> Result<Vec<BoardList>> {
        Ok(self
            .lock()
            .lists
            .iter()
            .filter(|(owner, _)| owner == board_id)
            .map(|(_, l)| l.clone())
            .collect())
    }

    fn add_card(&self, list_id: &str, name: &str, desc: &str) -> Result<Card> {
        let mut inner = self.lock();
        let id = inner.next_id("card");
        let card = Card {
            id: id.clone(),
            name: name.to_string(),
            desc: desc.to_string(),
            url: Some(format!("https://trello.example/c/{id}")),
            stickers: Vec::new(),
        };
        inner.cards.push((list_id.to_string(), card.clone()));
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_sticker_carries_template_image() {
        let board = MemoryBoard::with_custom_stickers(full_custom_stickers());
        board.insert_card("b", "c", "Card", "");
        let placement = Placement {
            left: 1.0,
            top: 5.0,
            z_index: 0,
            rotate: 3,
        };
        let sticker = board.add_sticker("c", "tmpl-g", placement).unwrap();
        assert!(sticker.image_url.ends_with("green.png"));
        assert_eq!(board.get_card("c").unwrap().stickers, vec![sticker]);
    }

    #[test]
    fn unknown_template_is_rejected() {
        let board = MemoryBoard::with_custom_stickers(full_custom_stickers());
        board.insert_card("b", "c", "Card", "");
        let placement = Placement {
            left: 0.0,
            top: 0.0,
            z_index: 0,
            rotate: 0,
        };
        assert!(board.add_sticker("c", "nope", placement).is_err());
        assert_eq!(board.sticker_adds(), 0);
    }

    #[test]
    fn failing_card_rejects_reads() {
        let board = MemoryBoard::new();
        board.insert_card("b", "c", "Card", "");
        board.fail_card("c");
        assert!(board.get_card("c").is_err());
        board.clear_failures();
        assert!(board.get_card("c").is_ok());
    }
}
