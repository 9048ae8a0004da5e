//! # Static Evaluation
//!
//! Material plus piece-square bonuses, in centipawns, returned from the
//! side-to-move's perspective (positive = good for whoever moves next). The
//! tables are written from white's point of view; black lookups mirror the
//! square vertically (`sq ^ 56`). Deliberately simple - positional nuance
//! beyond square tables is the search's job here, not the evaluator's.
//!
//! The optional `noise` parameter perturbs every leaf evaluation uniformly
//! in `[-noise, +noise]` centipawns. It exists to make weaker opponents
//! misjudge positions; with `noise = 0` evaluation is fully deterministic.

use crate::position::Position;
use crate::types::{mirror, Color, PieceKind};
use rand::Rng;

/// Material values in centipawns, indexed by [`PieceKind::index`].
pub const PIECE_VALUE: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 20000];

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10,-20,-20, 10, 10,  5,
     5, -5,-10,  0,  0,-10, -5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5,  5, 10, 25, 25, 10,  5,  5,
    10, 10, 20, 30, 30, 20, 10, 10,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,  0,  0,  5,  5,  0,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     5, 10, 10, 10, 10, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -10,  5,  5,  5,  5,  5,  0,-10,
     0,  0,  5,  5,  5,  5,  0, -5,
    -5,  0,  5,  5,  5,  5,  0, -5,
   -10,  0,  5,  5,  5,  5,  0,-10,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
    20, 30, 10,  0,  0, 10, 30, 20,
    20, 20,  0,  0,  0,  0, 20, 20,
   -10,-20,-20,-20,-20,-20,-20,-10,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
];

const PST: [&[i32; 64]; PieceKind::COUNT] = [
    &PAWN_PST,
    &KNIGHT_PST,
    &BISHOP_PST,
    &ROOK_PST,
    &QUEEN_PST,
    &KING_PST,
];

/// Evaluate the position in centipawns from the side-to-move's perspective.
///
/// `noise > 0` adds a uniform random perturbation in `[-noise, +noise]` -
/// leaf evaluations only; the search never perturbs at the root.
pub fn evaluate(pos: &Position, noise: i32) -> i32 {
    let mut score = 0;

    for sq in 0..64u8 {
        let Some(piece) = pos.piece_on(sq) else {
            continue;
        };
        let kind = piece.kind.index();
        let pst_sq = match piece.color {
            Color::White => sq,
            Color::Black => mirror(sq),
        };
        let value = PIECE_VALUE[kind] + PST[kind][pst_sq as usize];
        score += match piece.color {
            Color::White => value,
            Color::Black => -value,
        };
    }

    let mut eval = match pos.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    };

    if noise > 0 {
        eval += rand::thread_rng().gen_range(-noise..=noise);
    }

    eval
}
