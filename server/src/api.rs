//! HTTP surface of the engine
//!
//! Two endpoints, both JSON request/response:
//!
//! - `POST /move` - `{fen, uci_move}` → validate-and-apply. An illegal move
//!   is a 200 with `status: "INVALID"`; only malformed requests are 4xx.
//! - `POST /search` - `{fen, depth?, noise?}` → best move, score, node
//!   count. Depth defaults to 4 and must stay within 1-20.
//!
//! Field presence is checked by hand against a raw JSON value rather than
//! letting the extractor reject, so a missing `fen` is a 400 with a short
//! message instead of a framework-shaped error.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use rookery_engine::{GameState, MoveOutcome, OpeningBook};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Depth used when a search request does not specify one.
const DEFAULT_DEPTH: u32 = 4;

#[derive(Clone)]
pub struct AppState {
    book: Arc<OpeningBook>,
}

/// Build the service router with the standard opening book.
pub fn router() -> Router {
    let state = AppState {
        book: Arc::new(OpeningBook::standard()),
    };

    Router::new()
        .route("/move", post(play_move))
        .route("/search", post(search))
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

#[derive(Serialize)]
struct MoveResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    game_state: Option<GameState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_fen: Option<String>,
}

async fn play_move(body: Result<Json<Value>, JsonRejection>) -> Response {
    let Ok(Json(body)) = body else {
        return bad_request("invalid JSON");
    };
    let (Some(fen), Some(uci_move)) = (
        body.get("fen").and_then(Value::as_str),
        body.get("uci_move").and_then(Value::as_str),
    ) else {
        return bad_request("missing fen or uci_move");
    };

    match rookery_engine::play_move(fen, uci_move) {
        Err(_) => bad_request("failed to parse FEN"),
        Ok(MoveOutcome::Invalid) => {
            debug!(fen, uci_move, "move refused");
            Json(MoveResponse {
                status: "INVALID",
                game_state: None,
                new_fen: None,
            })
            .into_response()
        }
        Ok(MoveOutcome::Valid {
            game_state,
            new_fen,
        }) => Json(MoveResponse {
            status: "VALID",
            game_state: Some(game_state),
            new_fen: Some(new_fen),
        })
        .into_response(),
    }
}

async fn search(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return bad_request("invalid JSON");
    };
    let Some(fen) = body.get("fen").and_then(Value::as_str) else {
        return bad_request("missing fen");
    };

    // A depth of the wrong JSON type falls out of range and shares the
    // out-of-range response.
    let depth = match body.get("depth") {
        None => DEFAULT_DEPTH,
        Some(v) => v.as_u64().unwrap_or(0) as u32,
    };
    let noise = body.get("noise").and_then(Value::as_i64).unwrap_or(0) as i32;

    match rookery_engine::best_move(fen, depth, noise, &state.book) {
        Ok(report) => {
            debug!(
                fen,
                depth,
                best = %report.best_move,
                nodes = report.nodes,
                "search complete"
            );
            Json(report).into_response()
        }
        Err(rookery_engine::EngineError::DepthOutOfRange { .. }) => {
            bad_request("depth must be 1-20")
        }
        Err(rookery_engine::EngineError::Fen(_)) => bad_request("failed to parse FEN"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_response_omits_absent_fields() {
        let invalid = MoveResponse {
            status: "INVALID",
            game_state: None,
            new_fen: None,
        };
        let json = serde_json::to_string(&invalid).expect("serializable");
        assert_eq!(json, r#"{"status":"INVALID"}"#);
    }

    #[test]
    fn test_move_response_valid_shape() {
        let valid = MoveResponse {
            status: "VALID",
            game_state: Some(GameState::Active),
            new_fen: Some("8/8/8/8/8/8/8/8 w - - 0 1".to_string()),
        };
        let json = serde_json::to_string(&valid).expect("serializable");
        assert!(json.contains(r#""status":"VALID""#));
        assert!(json.contains(r#""game_state":"ACTIVE""#));
        assert!(json.contains(r#""new_fen""#));
    }

    #[test]
    fn test_error_response_shape() {
        let err = ErrorResponse {
            error: "failed to parse FEN".to_string(),
        };
        let json = serde_json::to_string(&err).expect("serializable");
        assert_eq!(json, r#"{"error":"failed to parse FEN"}"#);
    }
}
