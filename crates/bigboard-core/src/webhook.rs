//! Trello webhook payloads, delivery signatures, and registration.
//!
//! See <https://developer.atlassian.com/cloud/trello/guides/rest-api/webhooks/>.

use crate::error::Result;
use crate::service::{BoardService, Webhook};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha1::Sha1;
use subtle::ConstantTimeEq;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-trello-webhook";

/// Action types that can change a card's description or stickers.
pub const SYNC_ACTIONS: &[&str] = &["moveCardToBoard", "createCard", "updateCard"];

/// The card an inbound webhook action refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct CardEvent {
    pub action_type: String,
    pub card_id: String,
    pub board_id: Option<String>,
}

impl CardEvent {
    /// Pull `action.type` and `action.data.card.id` out of a delivery.
    ///
    /// Returns `None` when either is missing; such deliveries are ignored.
    pub fn from_payload(payload: &Value) -> Option<CardEvent> {
        let action = payload.get("action")?;
        let action_type = action.get("type")?.as_str()?;
        let data = action.get("data")?;
        let card_id = data.get("card")?.get("id")?.as_str()?;
        let board_id = data
            .get("board")
            .and_then(|b| b.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(CardEvent {
            action_type: action_type.to_string(),
            card_id: card_id.to_string(),
            board_id,
        })
    }

    pub fn triggers_sync(&self) -> bool {
        SYNC_ACTIONS.contains(&self.action_type.as_str())
    }
}

/// Signature Trello sends for `body` delivered to `callback_url`:
/// base64 of HMAC-SHA1 over the body followed by the callback URL.
pub fn sign(body: &[u8], callback_url: &str, secret: &str) -> String {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes())
        .expect("infallible: HMAC accepts keys of any length");
    mac.update(body);
    mac.update(callback_url.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

pub fn verify_signature(body: &[u8], callback_url: &str, secret: &str, signature: &str) -> bool {
    let expected = sign(body, callback_url, secret);
    expected.as_bytes().ct_eq(signature.trim().as_bytes()).into()
}

/// Point the token's webhooks at `board_id`, and only there.
///
/// Every webhook registered under the token is deleted first so repeated
/// setups never stack duplicate deliveries.
pub fn register_board_webhook(
    service: &dyn BoardService,
    token: &str,
    board_id: &str,
    callback_url: &str,
    description: &str,
) -> Result<Webhook> {
    let existing = service.list_webhooks(token)?;
    tracing::info!(count = existing.len(), "removing existing webhooks");
    for hook in &existing {
        tracing::info!(webhook_id = %hook.id, model = %hook.id_model, "removing webhook");
        service.delete_webhook(&hook.id)?;
    }

    let hook = service.add_webhook(board_id, callback_url, description)?;
    tracing::info!(webhook_id = %hook.id, board_id, callback_url, "registered board webhook");
    Ok(hook)
}
