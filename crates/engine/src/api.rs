//! # Engine Entry Points
//!
//! The two operations the service wrapper exposes, shaped for a stateless
//! request/response world: every call parses a FEN, does its work, and
//! returns plain data. No game state survives between calls - the only
//! cross-request state in the whole engine is the transposition table, and
//! that is a cache, not a source of truth.
//!
//! - [`play_move`] - validate a coordinate move against a position, apply
//!   it, and classify the resulting position (active / checkmate /
//!   stalemate / 50-move draw / insufficient material).
//! - [`best_move`] - consult the opening book, otherwise run the
//!   iterative-deepening search to the requested depth.

use crate::book::OpeningBook;
use crate::error::EngineError;
use crate::movegen::{generate_legal, is_in_check, resolve_coord_move};
use crate::moves::MoveList;
use crate::position::Position;
use crate::search;
use serde::{Deserialize, Serialize};

/// Depth accepted by [`best_move`].
pub const MIN_DEPTH: u32 = 1;
pub const MAX_DEPTH: u32 = 20;

/// Verdict on a position after a move has been applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "CHECKMATE")]
    Checkmate,
    #[serde(rename = "STALEMATE")]
    Stalemate,
    #[serde(rename = "DRAW_50_MOVE")]
    Draw50Move,
    #[serde(rename = "DRAW_INSUFFICIENT")]
    DrawInsufficient,
}

/// Result of a validate-and-apply request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move text did not resolve to a legal move in the position.
    Invalid,
    /// The move was applied; here is the world afterwards.
    Valid {
        game_state: GameState,
        new_fen: String,
    },
}

/// Result of a search request.
#[derive(Clone, Debug, Serialize)]
pub struct SearchReport {
    /// Best move in coordinate notation; empty when there is no legal move.
    pub best_move: String,
    /// Centipawns from the side-to-move's perspective.
    pub score: i32,
    /// The depth that was requested (book hits echo it unchanged).
    pub depth: u32,
    /// Nodes visited across all iterations; zero for book hits.
    pub nodes: u64,
}

/// Classify the position for the side to move. Checkmate and stalemate
/// outrank the draw rules: a mate delivered on the 100th halfmove is a mate.
pub fn classify(pos: &mut Position) -> GameState {
    let mut legal = MoveList::new();
    generate_legal(pos, &mut legal);

    if legal.is_empty() {
        return if is_in_check(pos, pos.side_to_move()) {
            GameState::Checkmate
        } else {
            GameState::Stalemate
        };
    }
    if pos.halfmove_clock() >= 100 {
        return GameState::Draw50Move;
    }
    if pos.is_insufficient_material() {
        return GameState::DrawInsufficient;
    }
    GameState::Active
}

/// Validate a coordinate move against `fen`, apply it, and report the
/// resulting game state and FEN.
///
/// # Errors
///
/// Only FEN parse failures error; a well-formed request with an illegal
/// move is a normal [`MoveOutcome::Invalid`] response.
pub fn play_move(fen: &str, coord_move: &str) -> Result<MoveOutcome, EngineError> {
    let mut pos = Position::from_fen(fen)?;

    let m = resolve_coord_move(&mut pos, coord_move);
    if m.is_null() {
        return Ok(MoveOutcome::Invalid);
    }

    pos.apply(m);
    let game_state = classify(&mut pos);
    Ok(MoveOutcome::Valid {
        game_state,
        new_fen: pos.to_fen(),
    })
}

/// Find the best move for `fen`: a uniformly random book move when the
/// position is in `book`, otherwise an iterative-deepening search to
/// `depth` plies (leaf evaluations perturbed by `noise` centipawns).
///
/// # Errors
///
/// Rejects unparseable FENs and depths outside `1..=20`.
pub fn best_move(
    fen: &str,
    depth: u32,
    noise: i32,
    book: &OpeningBook,
) -> Result<SearchReport, EngineError> {
    if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
        return Err(EngineError::DepthOutOfRange { depth });
    }

    let mut pos = Position::from_fen(fen)?;

    // Book first: a hit answers instantly and costs zero nodes.
    if let Some(line) = book.pick(&pos.to_fen()) {
        return Ok(SearchReport {
            best_move: line.to_string(),
            score: 0,
            depth,
            nodes: 0,
        });
    }

    let result = search::search(&mut pos, depth, noise);
    Ok(SearchReport {
        best_move: result.best_move.to_coord(),
        score: result.score,
        depth,
        nodes: result.nodes,
    })
}
