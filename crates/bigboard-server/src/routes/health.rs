use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /health — liveness, plus whether the sticker catalog is loaded yet.
pub async fn health(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "catalog_populated": app.catalog.is_populated(),
    }))
}
