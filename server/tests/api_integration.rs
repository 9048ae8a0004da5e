//! End-to-end tests of the HTTP surface using the Router::oneshot pattern.
//!
//! Each test drives a request through the full axum stack - JSON framing,
//! field validation, engine call, response shaping - without binding a
//! socket.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use rookery_server::api;
use serde_json::{json, Value};
use tower::ServiceExt;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn app() -> Router {
    api::router()
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_opening_pawn_push() {
    //! S1: 1.e4 from the initial position is valid, game stays active, and
    //! the new FEN carries the e3 en-passant target.

    let (status, body) = post_json(
        app(),
        "/move",
        json!({"fen": START_FEN, "uci_move": "e2e4"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "VALID");
    assert_eq!(body["game_state"], "ACTIVE");
    assert_eq!(
        body["new_fen"],
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
}

#[tokio::test]
async fn test_fools_mate_is_reported_checkmate() {
    //! S2: the fool's-mate queen check is a checkmate verdict with the
    //! post-move FEN.

    let (status, body) = post_json(
        app(),
        "/move",
        json!({
            "fen": "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2",
            "uci_move": "d8h4"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "VALID");
    assert_eq!(body["game_state"], "CHECKMATE");
    assert_eq!(
        body["new_fen"],
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
    );
}

#[tokio::test]
async fn test_illegal_move_is_invalid_with_200() {
    //! S3: a well-formed but illegal move is refused by the rules, not by
    //! the transport.

    let (status, body) = post_json(
        app(),
        "/move",
        json!({"fen": START_FEN, "uci_move": "e2e5"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "INVALID");
    assert!(body.get("game_state").is_none());
    assert!(body.get("new_fen").is_none());
}

#[tokio::test]
async fn test_castling_clears_rights() {
    //! S4: castling kingside relocates both pieces and drops white's
    //! castling rights from the FEN.

    let (status, body) = post_json(
        app(),
        "/move",
        json!({
            "fen": "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            "uci_move": "e1g1"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "VALID");
    assert_eq!(body["game_state"], "ACTIVE");
    assert_eq!(body["new_fen"], "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
}

#[tokio::test]
async fn test_en_passant_capture() {
    //! S5: e5xd6 en passant removes the black d-pawn and resets the target.

    let (status, body) = post_json(
        app(),
        "/move",
        json!({
            "fen": "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
            "uci_move": "e5d6"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "VALID");
    let new_fen = body["new_fen"].as_str().expect("new_fen present");
    assert!(
        new_fen.starts_with("rnbqkbnr/ppp1pppp/3P4/8/8/8/PPPP1PPP/RNBQKBNR b"),
        "black d-pawn removed, white pawn on d6: {new_fen}"
    );
    assert!(new_fen.contains(" - "), "en-passant target reset: {new_fen}");
}

#[tokio::test]
async fn test_search_startpos_hits_the_book() {
    //! The server carries the standard book, so the initial position
    //! answers instantly with a known line and zero nodes.

    let (status, body) = post_json(app(), "/search", json!({"fen": START_FEN, "depth": 3}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"], 0);
    assert_eq!(body["depth"], 3);
    let best = body["best_move"].as_str().expect("best_move present");
    assert!(["e2e4", "d2d4", "g1f3", "c2c4"].contains(&best));
}

#[tokio::test]
async fn test_search_out_of_book_runs_the_engine() {
    //! S6 (service flavor): a non-book position actually searches - node
    //! count positive, move legal.

    let fen = "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
    let (status, body) = post_json(app(), "/search", json!({"fen": fen, "depth": 2})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["nodes"].as_u64().expect("nodes present") > 0);
    let best = body["best_move"].as_str().expect("best_move present");

    // Round-trip the reported move through /move to prove it is legal.
    let (status, verdict) =
        post_json(app(), "/move", json!({"fen": fen, "uci_move": best})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verdict["status"], "VALID");
}

#[tokio::test]
async fn test_search_finds_mate_in_one() {
    //! S7: the back-rank mate is found at depth 2 with a mate score.

    let (status, body) = post_json(
        app(),
        "/search",
        json!({"fen": "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", "depth": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["best_move"], "a1a8");
    assert!(body["score"].as_i64().expect("score present") >= 100_000 - 4);
}

#[tokio::test]
async fn test_search_depth_defaults_to_four() {
    let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    let (status, body) = post_json(app(), "/search", json!({"fen": fen})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["depth"], 4);
}

#[tokio::test]
async fn test_move_rejects_missing_fields() {
    let (status, body) = post_json(app(), "/move", json!({"fen": START_FEN})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing fen or uci_move");

    let (status, _) = post_json(app(), "/move", json!({"uci_move": "e2e4"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_move_rejects_bad_fen() {
    let (status, body) = post_json(
        app(),
        "/move",
        json!({"fen": "definitely not chess", "uci_move": "e2e4"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "failed to parse FEN");
}

#[tokio::test]
async fn test_search_rejects_missing_fen_and_bad_depth() {
    let (status, body) = post_json(app(), "/search", json!({"depth": 3})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing fen");

    for depth in [json!(0), json!(21), json!("three")] {
        let (status, body) =
            post_json(app(), "/search", json!({"fen": START_FEN, "depth": depth})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "depth {depth} accepted");
        assert_eq!(body["error"], "depth must be 1-20");
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/move")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
