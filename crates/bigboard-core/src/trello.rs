//! Blocking client for the Trello REST API.

use crate::config::TrelloConfig;
use crate::error::{BoardError, Result};
use crate::service::{
    BoardList, BoardService, Card, CustomSticker, Placement, Sticker, Webhook,
};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

const CARD_FIELDS: &str = "name,desc,url";

pub struct TrelloClient {
    http: Client,
    base_url: String,
    api_key: String,
    token: String,
}

impl TrelloClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bigboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &TrelloConfig) -> Result<Self> {
        let (Some(key), Some(token)) = (&config.api_key, &config.token) else {
            return Err(BoardError::MissingCredentials);
        };
        Self::new(
            config.base_url.clone(),
            key.clone(),
            token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.query(&[("key", self.api_key.as_str()), ("token", self.token.as_str())])
    }

    fn send(&self, builder: RequestBuilder) -> Result<reqwest::blocking::Response> {
        let response = self.authed(builder).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %body, "Trello request failed");
            return Err(BoardError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self.send(self.http.get(self.url(path)).query(query))?;
        Ok(response.json()?)
    }
}

impl BoardService for TrelloClient {
    fn get_board_cards(&self, board_id: &str) -> Result<Vec<Card>> {
        self.get_json(
            &format!("/boards/{board_id}/cards"),
            &[("fields", CARD_FIELDS), ("stickers", "true")],
        )
    }

    fn get_card(&self, card_id: &str) -> Result<Card> {
        let path = format!("/cards/{card_id}");
        match self.get_json(&path, &[("fields", CARD_FIELDS), ("stickers", "true")]) {
            Err(BoardError::Api { status: 404, .. }) => {
                Err(BoardError::CardNotFound(card_id.to_string()))
            }
            other => other,
        }
    }

    fn list_custom_stickers(&self) -> Result<Vec<CustomSticker>> {
        self.get_json("/members/me/customStickers", &[])
    }

    fn add_sticker(
        &self,
        card_id: &str,
        template_id: &str,
        placement: Placement,
    ) -> Result<Sticker> {
        let body = serde_json::json!({
            "image": template_id,
            "top": placement.top,
            "left": placement.left,
            "zIndex": placement.z_index,
            "rotate": placement.rotate,
        });
        let url = self.url(&format!("/cards/{card_id}/stickers"));
        Ok(self.send(self.http.post(url).json(&body))?.json()?)
    }

    fn remove_sticker(&self, card_id: &str, sticker_id: &str) -> Result<()> {
        let url = self.url(&format!("/cards/{card_id}/stickers/{sticker_id}"));
        self.send(self.http.delete(url))?;
        Ok(())
    }

    fn list_webhooks(&self, token: &str) -> Result<Vec<Webhook>> {
        self.get_json(&format!("/tokens/{token}/webhooks"), &[])
    }

    fn add_webhook(
        &self,
        model_id: &str,
        callback_url: &str,
        description: &str,
    ) -> Result<Webhook> {
        let body = serde_json::json!({
            "idModel": model_id,
            "callbackURL": callback_url,
            "description": description,
        });
        Ok(self.send(self.http.post(self.url("/webhooks")).json(&body))?.json()?)
    }

    fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        self.send(self.http.delete(self.url(&format!("/webhooks/{webhook_id}"))))?;
        Ok(())
    }

    fn get_board_lists(&self, board_id: &str) -> Result<Vec<BoardList>> {
        self.get_json(
            &format!("/boards/{board_id}/lists"),
            &[("fields", "name"), ("filter", "open")],
        )
    }

    fn add_card(&self, list_id: &str, name: &str, desc: &str) -> Result<Card> {
        let body = serde_json::json!({
            "idList": list_id,
            "name": name,
            "desc": desc,
        });
        Ok(self.send(self.http.post(self.url("/cards")).json(&body))?.json()?)
    }
}
