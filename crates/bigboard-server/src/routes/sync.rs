use axum::extract::{Path, State};
use axum::Json;
use bigboard_core::sync::{sync_all, sync_one};

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/cards/{id}/sync — reconcile one card's stickers.
pub async fn sync_card(
    State(app): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = card_id.clone();
    let outcome = tokio::task::spawn_blocking(move || sync_one(&app.reconciler(), &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let mut body = serde_json::to_value(&outcome)?;
    body["card_id"] = serde_json::Value::String(card_id);
    Ok(Json(body))
}

/// POST /api/boards/{name}/sync — reconcile every card on a configured board.
pub async fn sync_board(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let board_id = app.config.board_id(&name)?.to_string();
    let report = tokio::task::spawn_blocking(move || sync_all(&app.reconciler(), &board_id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&report)?))
}
