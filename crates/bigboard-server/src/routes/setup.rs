use axum::extract::State;
use axum::Json;
use bigboard_core::setup::run_setup;

use crate::error::AppError;
use crate::state::AppState;

/// POST /setup — register the board webhook, populate the sticker catalog,
/// and sync every card on the primary board.
///
/// Card-level failures are reported in the body; configuration failures
/// (incomplete catalog, unknown board) fail the request.
pub async fn run(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let report = tokio::task::spawn_blocking(move || {
        run_setup(
            app.service.clone(),
            app.catalog.clone(),
            &app.config,
            app.token.as_deref(),
        )
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::to_value(&report)?))
}
