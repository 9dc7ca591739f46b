use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/stickers — the resolved sticker catalog, populating it if needed.
pub async fn list_stickers(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        app.catalog.ensure_populated(app.service.as_ref())?;
        let entries: Vec<serde_json::Value> = app
            .catalog
            .entries()?
            .iter()
            .map(|e| {
                serde_json::json!({
                    "letter": e.color.letter().to_string(),
                    "color": e.color,
                    "template_id": e.template_id,
                    "image_url": e.image_url,
                })
            })
            .collect();
        Ok::<_, bigboard_core::BoardError>(serde_json::json!(entries))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
