use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use bigboard_core::sync::sync_one;
use bigboard_core::webhook::{verify_signature, CardEvent, SIGNATURE_HEADER};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::state::AppState;

/// HEAD /webhook/update_board — Trello probes the callback URL with a HEAD
/// request when the webhook is created and expects a 200.
pub async fn head_update_board() -> StatusCode {
    StatusCode::OK
}

/// POST /webhook/update_board — a board action was delivered.
///
/// Deliveries without an action type or card id, and actions that cannot
/// change stickers, are acknowledged and ignored.
pub async fn post_update_board(
    State(app): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(secret) = &app.config.webhook.secret {
        let callback_url = app.config.webhook.callback_url.as_deref().unwrap_or("");
        let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
            warn!("webhook delivery without signature header");
            return Err(AppError::unauthorized("missing webhook signature"));
        };
        if !verify_signature(&body, callback_url, secret, signature) {
            warn!("webhook delivery with invalid signature");
            return Err(AppError::unauthorized("invalid webhook signature"));
        }
    }

    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("webhook body is not JSON: {e}")))?;
    debug!(%payload, "webhook body");

    let Some(event) = CardEvent::from_payload(&payload) else {
        info!("ignoring webhook without action type or card id");
        return Ok(Json(serde_json::json!({
            "status": "ignored",
            "reason": "missing_card",
        })));
    };

    handle_event(app, event).await
}

#[derive(Debug, Deserialize)]
pub struct DevQuery {
    pub card: String,
    #[serde(default = "default_dev_action")]
    pub action: String,
}

fn default_dev_action() -> String {
    "updateCard".to_string()
}

/// GET /webhook/update_board?card=<id> — unsigned trigger for local
/// debugging. Only served when `server.dev_mode` is set.
pub async fn get_update_board(
    State(app): State<AppState>,
    query: Result<Query<DevQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !app.config.server.dev_mode {
        return Err(AppError::not_found("not found"));
    }
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
    let event = CardEvent {
        action_type: query.action,
        card_id: query.card,
        board_id: None,
    };
    handle_event(app, event).await
}

async fn handle_event(app: AppState, event: CardEvent) -> Result<Json<serde_json::Value>, AppError> {
    if !event.triggers_sync() {
        debug!(action = %event.action_type, card_id = %event.card_id, "ignoring action");
        return Ok(Json(serde_json::json!({
            "status": "ignored",
            "reason": "unhandled_action",
            "action": event.action_type,
        })));
    }

    info!(
        card_id = %event.card_id,
        action = %event.action_type,
        "syncing card stickers"
    );

    let card_id = event.card_id.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let reconciler = app.reconciler();
        sync_one(&reconciler, &event.card_id)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let mut body = serde_json::to_value(&outcome)?;
    body["card_id"] = serde_json::Value::String(card_id);
    Ok(Json(body))
}
