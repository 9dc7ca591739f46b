use axum::http::StatusCode;
use bigboard_core::config::Config;
use bigboard_core::memory::{full_custom_stickers, MemoryBoard};
use bigboard_core::service::BoardService;
use bigboard_core::webhook::{sign, SIGNATURE_HEADER};
use bigboard_server::{build_router, AppState, WEBHOOK_PATH};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

const BOARD: &str = "board-big";
const CALLBACK: &str = "https://hooks.example/webhook/update_board";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_config() -> Config {
    let mut config = Config::default();
    config.boards.insert("big_board".into(), BOARD.into());
    config.boards.insert("proposals".into(), "board-proposals".into());
    config.trello.token = Some("tok".into());
    config.webhook.callback_url = Some(CALLBACK.into());
    config
}

/// A board with a complete sticker set and one card carrying `desc`.
fn seeded_board(desc: &str) -> Arc<MemoryBoard> {
    let board = MemoryBoard::with_custom_stickers(full_custom_stickers());
    board.insert_card(BOARD, "c1", "Apollo", desc);
    Arc::new(board)
}

fn app_with(config: Config, board: &Arc<MemoryBoard>) -> axum::Router {
    let service: Arc<dyn BoardService> = board.clone();
    build_router(AppState::new(config, service))
}

fn update_card_payload(card_id: &str) -> serde_json::Value {
    serde_json::json!({
        "action": {
            "type": "updateCard",
            "data": {
                "card": { "id": card_id },
                "board": { "id": BOARD },
            },
        },
        "model": { "id": BOARD },
    })
}

async fn send(app: axum::Router, req: axum::http::Request<axum::body::Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    send(app, req).await
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, req).await
}

/// POST raw bytes to the webhook path, optionally with a signature header.
async fn post_webhook(
    app: axum::Router,
    body: Vec<u8>,
    signature: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder()
        .method("POST")
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header(SIGNATURE_HEADER, sig);
    }
    let req = builder.body(axum::body::Body::from(body)).unwrap();
    send(app, req).await
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

#[tokio::test]
async fn head_handshake_returns_ok() {
    let board = seeded_board("");
    let app = app_with(test_config(), &board);
    let req = axum::http::Request::builder()
        .method("HEAD")
        .uri(WEBHOOK_PATH)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_card_delivery_places_stickers() {
    let board = seeded_board("Launch ||GR|| soon");
    let app = app_with(test_config(), &board);

    let (status, json) = post_json(app, WEBHOOK_PATH, update_card_payload("c1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "updated");
    assert_eq!(json["card_id"], "c1");
    assert_eq!(json["added"], 2);

    let card = board.get_card("c1").unwrap();
    let images: Vec<&str> = card.stickers.iter().map(|s| s.image.as_str()).collect();
    assert_eq!(images, vec!["tmpl-g", "tmpl-r"]);
}

#[tokio::test]
async fn second_delivery_is_in_sync() {
    let board = seeded_board("||Y||");
    let app = app_with(test_config(), &board);

    let (_, first) = post_json(app.clone(), WEBHOOK_PATH, update_card_payload("c1")).await;
    assert_eq!(first["status"], "updated");
    let (status, second) = post_json(app, WEBHOOK_PATH, update_card_payload("c1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["status"], "in_sync");
    assert_eq!(board.sticker_adds(), 1);
}

#[tokio::test]
async fn delivery_without_card_is_ignored() {
    let board = seeded_board("||G||");
    let app = app_with(test_config(), &board);
    let payload = serde_json::json!({ "action": { "type": "updateBoard", "data": {} } });

    let (status, json) = post_json(app, WEBHOOK_PATH, payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ignored");
    assert_eq!(json["reason"], "missing_card");
    assert_eq!(board.sticker_adds(), 0);
}

#[tokio::test]
async fn unrelated_action_is_ignored() {
    let board = seeded_board("||G||");
    let app = app_with(test_config(), &board);
    let mut payload = update_card_payload("c1");
    payload["action"]["type"] = "commentCard".into();

    let (status, json) = post_json(app, WEBHOOK_PATH, payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reason"], "unhandled_action");
    assert_eq!(board.sticker_adds(), 0);
}

#[tokio::test]
async fn non_json_delivery_is_rejected() {
    let board = seeded_board("");
    let app = app_with(test_config(), &board);

    let (status, json) = post_webhook(app, b"not json".to_vec(), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn delivery_for_unknown_card_returns_404() {
    let board = seeded_board("");
    let app = app_with(test_config(), &board);

    let (status, _) = post_json(app, WEBHOOK_PATH, update_card_payload("nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incomplete_catalog_fails_delivery() {
    let board = MemoryBoard::with_custom_stickers(
        full_custom_stickers().into_iter().take(3).collect(),
    );
    board.insert_card(BOARD, "c1", "Apollo", "||G||");
    let board = Arc::new(board);
    let app = app_with(test_config(), &board);

    let (status, json) = post_json(app, WEBHOOK_PATH, update_card_payload("c1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("custom stickers missing"));
    assert_eq!(board.sticker_adds(), 0);
}

#[tokio::test]
async fn signed_delivery_is_accepted() {
    let board = seeded_board("||P||");
    let mut config = test_config();
    config.webhook.secret = Some("s3cret".into());
    let app = app_with(config, &board);

    let body = serde_json::to_vec(&update_card_payload("c1")).unwrap();
    let signature = sign(&body, CALLBACK, "s3cret");
    let (status, json) = post_webhook(app, body, Some(&signature)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "updated");
}

#[tokio::test]
async fn bad_signature_is_rejected() {
    let board = seeded_board("||P||");
    let mut config = test_config();
    config.webhook.secret = Some("s3cret".into());
    let app = app_with(config, &board);

    let body = serde_json::to_vec(&update_card_payload("c1")).unwrap();
    let signature = sign(&body, CALLBACK, "wrong");
    let (status, _) = post_webhook(app.clone(), body.clone(), Some(&signature)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post_webhook(app, body, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(board.sticker_adds(), 0);
}

#[tokio::test]
async fn dev_trigger_is_hidden_outside_dev_mode() {
    let board = seeded_board("||G||");
    let app = app_with(test_config(), &board);

    let (status, _) = get(app, &format!("{WEBHOOK_PATH}?card=c1")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(board.sticker_adds(), 0);
}

#[tokio::test]
async fn bare_get_outside_dev_mode_is_not_found() {
    let board = seeded_board("||G||");
    let app = app_with(test_config(), &board);

    let (status, _) = get(app, WEBHOOK_PATH).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dev_trigger_without_card_is_rejected() {
    let board = seeded_board("||G||");
    let mut config = test_config();
    config.server.dev_mode = true;
    let app = app_with(config, &board);

    let (status, json) = get(app, WEBHOOK_PATH).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
    assert_eq!(board.sticker_adds(), 0);
}

#[tokio::test]
async fn dev_trigger_syncs_in_dev_mode() {
    let board = seeded_board("||W||");
    let mut config = test_config();
    config.server.dev_mode = true;
    let app = app_with(config, &board);

    let (status, json) = get(app, &format!("{WEBHOOK_PATH}?card=c1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "updated");
    assert_eq!(board.get_card("c1").unwrap().stickers.len(), 1);
}

// ---------------------------------------------------------------------------
// Setup and manual sync
// ---------------------------------------------------------------------------

#[tokio::test]
async fn setup_registers_webhook_and_syncs_board() {
    let board = seeded_board("||GY||");
    board.insert_card(BOARD, "c2", "Gemini", "no marker");
    board.insert_webhook("old-board", "https://old.example/hook");
    let app = app_with(test_config(), &board);

    let (status, json) = post_json(app, "/setup", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["board_id"], BOARD);
    assert_eq!(json["updated"], 1);
    assert_eq!(json["in_sync"], 1);
    assert!(json["failures"].as_array().unwrap().is_empty());

    let hooks = board.webhooks();
    assert_eq!(hooks.len(), 1);
    assert_eq!(hooks[0].id_model, BOARD);
    assert_eq!(hooks[0].callback_url, CALLBACK);
}

#[tokio::test]
async fn setup_reports_card_failures_without_failing() {
    let board = seeded_board("||G||");
    board.insert_card(BOARD, "c2", "Gemini", "||R||");
    board.fail_card("c2");
    let app = app_with(test_config(), &board);

    let (status, json) = post_json(app, "/setup", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["updated"], 1);
    assert_eq!(json["failures"][0]["card_id"], "c2");
}

#[tokio::test]
async fn manual_card_sync_returns_outcome() {
    let board = seeded_board("||RR||");
    let app = app_with(test_config(), &board);

    let (status, json) = post_json(app, "/api/cards/c1/sync", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "updated");
    assert_eq!(json["card_id"], "c1");
    assert_eq!(board.get_card("c1").unwrap().stickers.len(), 2);
}

#[tokio::test]
async fn board_sync_for_unknown_name_returns_404() {
    let board = seeded_board("");
    let app = app_with(test_config(), &board);

    let (status, json) = post_json(app, "/api/boards/archive/sync", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("archive"));
}

#[tokio::test]
async fn board_sync_reports_counts() {
    let board = seeded_board("||G||");
    let app = app_with(test_config(), &board);

    let (status, json) = post_json(app, "/api/boards/big_board/sync", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["updated"], 1);
}

#[tokio::test]
async fn board_sync_with_incomplete_catalog_fails() {
    let board = Arc::new(MemoryBoard::new());
    board.insert_card(BOARD, "c1", "Apollo", "||G||");
    board.insert_card(BOARD, "c2", "Gemini", "||R||");
    let app = app_with(test_config(), &board);

    let (status, json) = post_json(app, "/api/boards/big_board/sync", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("custom stickers missing"));
    assert_eq!(board.custom_sticker_fetches(), 1);
    assert_eq!(board.sticker_adds(), 0);
}

// ---------------------------------------------------------------------------
// Catalog, proposals, health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stickers_lists_every_color() {
    let board = seeded_board("");
    let app = app_with(test_config(), &board);

    let (status, json) = get(app, "/api/stickers").await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 5);
    let letters: Vec<&str> = entries.iter().map(|e| e["letter"].as_str().unwrap()).collect();
    for letter in ["G", "P", "R", "W", "Y"] {
        assert!(letters.contains(&letter), "missing {letter}");
    }
}

#[tokio::test]
async fn stickers_with_incomplete_catalog_returns_500() {
    let board = Arc::new(MemoryBoard::new());
    let app = app_with(test_config(), &board);

    let (status, json) = get(app, "/api/stickers").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn proposal_lands_on_first_list() {
    let board = seeded_board("");
    board.insert_list("board-proposals", "list-inbox", "Inbox");
    board.insert_list("board-proposals", "list-later", "Later");
    let app = app_with(test_config(), &board);

    let (status, json) = post_json(
        app,
        "/api/proposals",
        serde_json::json!({ "name": "  Moon base  ", "desc": "[deck](https://docs.example/deck)" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Moon base");
    let cards = board.cards_on_list("list-inbox");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].desc, "[deck](https://docs.example/deck)");
    assert!(board.cards_on_list("list-later").is_empty());
}

#[tokio::test]
async fn proposal_with_blank_name_is_rejected() {
    let board = seeded_board("");
    board.insert_list("board-proposals", "list-inbox", "Inbox");
    let app = app_with(test_config(), &board);

    let (status, _) = post_json(app, "/api/proposals", serde_json::json!({ "name": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn proposal_on_board_without_lists_returns_422() {
    let board = seeded_board("");
    let app = app_with(test_config(), &board);

    let (status, _) = post_json(app, "/api/proposals", serde_json::json!({ "name": "Moon base" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn health_reports_catalog_state() {
    let board = seeded_board("||G||");
    let app = app_with(test_config(), &board);

    let (status, json) = get(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["catalog_populated"], false);

    post_json(app.clone(), WEBHOOK_PATH, update_card_payload("c1")).await;
    let (_, json) = get(app, "/health").await;
    assert_eq!(json["catalog_populated"], true);
}
