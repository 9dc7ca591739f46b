use axum::extract::State;
use axum::Json;
use bigboard_core::proposals::add_proposal_card;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProposalBody {
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

/// POST /api/proposals — add a project proposal card to the proposals board.
pub async fn create_proposal(
    State(app): State<AppState>,
    Json(body): Json<ProposalBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let board_id = app.config.proposals_board_id()?.to_string();
    let card = tokio::task::spawn_blocking(move || {
        add_proposal_card(app.service.as_ref(), &board_id, &body.name, &body.desc)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "id": card.id,
        "name": card.name,
        "url": card.url,
    })))
}
