//! The board service seam: the remote Trello operations the sync engine and
//! its setup tooling rely on.

use crate::error::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Remote types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub stickers: Vec<Sticker>,
}

/// A sticker instance attached to a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    pub id: String,
    /// Template id the sticker was pasted from.
    #[serde(default)]
    pub image: String,
    pub image_url: String,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub z_index: i64,
    #[serde(default)]
    pub rotate: f64,
}

/// A custom sticker definition uploaded to the automation account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSticker {
    pub id: String,
    pub url: String,
}

/// Where and how a new sticker lands on a card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub z_index: i64,
    pub rotate: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub id_model: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// BoardService
// ---------------------------------------------------------------------------

/// Request/response access to the remote board service.
///
/// Every call may fail with a transport or permission error; callers surface
/// those failures rather than retrying.
pub trait BoardService: Send + Sync {
    /// All open cards on a board, stickers included, in board order.
    fn get_board_cards(&self, board_id: &str) -> Result<Vec<Card>>;

    fn get_card(&self, card_id: &str) -> Result<Card>;

    /// Custom stickers owned by the authenticated account.
    fn list_custom_stickers(&self) -> Result<Vec<CustomSticker>>;

    fn add_sticker(&self, card_id: &str, template_id: &str, placement: Placement)
        -> Result<Sticker>;

    fn remove_sticker(&self, card_id: &str, sticker_id: &str) -> Result<()>;

    /// Webhooks registered under the given API token.
    fn list_webhooks(&self, token: &str) -> Result<Vec<Webhook>>;

    fn add_webhook(&self, model_id: &str, callback_url: &str, description: &str)
        -> Result<Webhook>;

    fn delete_webhook(&self, webhook_id: &str) -> Result<()>;

    fn get_board_lists(&self, board_id: &str) -> Result<Vec<BoardList>>;

    fn add_card(&self, list_id: &str, name: &str, desc: &str) -> Result<Card>;
}
