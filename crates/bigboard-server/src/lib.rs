pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Path Trello delivers board actions to.
pub const WEBHOOK_PATH: &str = "/webhook/update_board";

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        // Trello webhook
        .route(
            WEBHOOK_PATH,
            post(routes::webhook::post_update_board)
                .head(routes::webhook::head_update_board)
                .get(routes::webhook::get_update_board),
        )
        // Bootstrap
        .route("/setup", post(routes::setup::run))
        // Manual sync
        .route("/api/cards/{id}/sync", post(routes::sync::sync_card))
        .route("/api/boards/{name}/sync", post(routes::sync::sync_board))
        // Catalog
        .route("/api/stickers", get(routes::stickers::list_stickers))
        // Proposals
        .route("/api/proposals", post(routes::proposals::create_proposal))
        // Health
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the webhook server on `0.0.0.0:{port}`.
pub async fn serve(app_state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener).await
}

/// Start the webhook server on a pre-bound listener.
///
/// Accepts a `TcpListener` that was already bound so the caller can read the
/// actual port before starting (useful when `port = 0`).
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state);

    tracing::info!("big board webhook server listening on http://0.0.0.0:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
