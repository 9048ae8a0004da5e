//! Perft: the move-generator correctness oracle
//!
//! Counts every legal move sequence to a fixed depth and compares against
//! published node counts. A single off-by-one anywhere in generation,
//! legality filtering, or make/unmake shows up as a wrong total here.

use rookery_engine::movegen::perft;
use rookery_engine::position::{Position, START_FEN};

/// A tactically dense middlegame standard ("Kiwipete"): castling both ways,
/// en passant, promotions, pins, and checks all in one position.
const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// A sparse rook endgame with en-passant and promotion traps.
const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

fn run_perft(fen: &str, depth: u32) -> u64 {
    let mut pos = Position::from_fen(fen).expect("valid FEN");
    let nodes = perft(&mut pos, depth);
    assert_eq!(pos.to_fen(), fen, "perft must leave the position untouched");
    nodes
}

#[test]
fn perft_startpos_depth_1() {
    assert_eq!(run_perft(START_FEN, 1), 20);
}

#[test]
fn perft_startpos_depth_2() {
    assert_eq!(run_perft(START_FEN, 2), 400);
}

#[test]
fn perft_startpos_depth_3() {
    assert_eq!(run_perft(START_FEN, 3), 8_902);
}

#[test]
fn perft_startpos_depth_4() {
    assert_eq!(run_perft(START_FEN, 4), 197_281);
}

#[test]
#[ignore = "minutes in debug builds; run with --release --ignored"]
fn perft_startpos_depth_5() {
    assert_eq!(run_perft(START_FEN, 5), 4_865_609);
}

#[test]
fn perft_kiwipete_depth_1() {
    assert_eq!(run_perft(KIWIPETE, 1), 48);
}

#[test]
fn perft_kiwipete_depth_2() {
    assert_eq!(run_perft(KIWIPETE, 2), 2_039);
}

#[test]
#[ignore = "slow in debug builds; run with --release --ignored"]
fn perft_kiwipete_depth_3() {
    assert_eq!(run_perft(KIWIPETE, 3), 97_862);
}

#[test]
fn perft_endgame_depth_1() {
    assert_eq!(run_perft(ENDGAME, 1), 14);
}

#[test]
fn perft_endgame_depth_2() {
    assert_eq!(run_perft(ENDGAME, 2), 191);
}

#[test]
fn perft_endgame_depth_3() {
    assert_eq!(run_perft(ENDGAME, 3), 2_812);
}

#[test]
fn perft_endgame_depth_4() {
    assert_eq!(run_perft(ENDGAME, 4), 43_238);
}
