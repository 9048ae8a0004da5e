//! # Iterative-Deepening Principal-Variation Search
//!
//! ## Overview
//!
//! The searcher is a negamax alpha-beta with the classic refinements layered
//! on top, each one earning its keep by shrinking the tree:
//!
//! - **Iterative deepening** - search depth 1, then 2, ... up to the request
//!   depth. Each iteration seeds the next one's move ordering through the
//!   transposition table, so the deeper searches start near-best-first.
//! - **Principal variation search** - the first move gets a full window;
//!   later moves get a zero-width window and are re-searched only if they
//!   surprise us.
//! - **Null-move pruning** - hand the opponent a free move; if they still
//!   cannot reach beta, the node is a cutoff (skipped in check, in PV
//!   nodes, and in pawn-only endgames where zugzwang lurks).
//! - **Late-move reductions** - moves ordered far down the list get a
//!   shallower look first, with a re-search on any surprise.
//! - **Check extension** - never drop into quiescence while in check, so
//!   forced sequences are resolved.
//! - **In-search repetition detection** - the path of Zobrist hashes from
//!   the root is scanned every node (same-side plies only); a repeat scores
//!   as a draw.
//!
//! Killer moves, the history table, and the path-hash array live in a
//! per-search [`SearchContext`], fresh on every call. The transposition
//! table deliberately is *not* per-search: it persists across requests (see
//! [`tt`]).
//!
//! ## Scores
//!
//! Centipawns from the side-to-move's perspective. Mate scores are
//! `±(MATE_SCORE − ply)`, so shorter mates score higher; anything beyond
//! ±90000 is a mate score.

mod ordering;
mod quiescence;
pub mod tt;

use crate::movegen::{generate_legal, is_in_check};
use crate::moves::{Move, MoveList};
use crate::position::Position;
use crate::search::ordering::{order_moves, score_move};
use crate::search::quiescence::quiescence;
use crate::search::tt::{Bound, TranspositionTable, TT};
use tracing::debug;

/// Score of delivering checkmate at the root.
pub const MATE_SCORE: i32 = 100_000;

/// Window bound; above any reachable score.
const INFINITY: i32 = 1_000_000;

/// Depth subtracted (beyond the usual one) for a null-move verification.
const NULL_MOVE_REDUCTION: i32 = 3;

/// Hard cap on search-path length; guards the path-hash array and the
/// position's history stack against pathological check-extension chains.
const MAX_PLY: usize = 128;

/// Per-search scratch state. Created fresh for every `search` call.
pub struct SearchContext {
    pub nodes: u64,
    pub killers: [[Move; 2]; 64],
    pub history: Box<[[[i32; 64]; 64]; 2]>,
    pub path_hashes: [u64; 256],
}

impl SearchContext {
    pub fn new() -> SearchContext {
        SearchContext {
            nodes: 0,
            killers: [[Move::NULL; 2]; 64],
            history: Box::new([[[0; 64]; 64]; 2]),
            path_hashes: [0; 256],
        }
    }
}

impl Default for SearchContext {
    fn default() -> SearchContext {
        SearchContext::new()
    }
}

/// Outcome of a search: the best root move, its score, and how many nodes
/// were visited across all iterations.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub nodes: u64,
}

/// Search using the process-wide transposition table.
pub fn search(pos: &mut Position, depth: u32, noise: i32) -> SearchResult {
    search_with_tt(pos, depth, noise, &TT)
}

/// Iterative-deepening search against an explicit table (tests use a
/// private table for reproducible node counts).
pub fn search_with_tt(
    pos: &mut Position,
    depth: u32,
    noise: i32,
    tt: &TranspositionTable,
) -> SearchResult {
    let mut result = SearchResult {
        best_move: Move::NULL,
        score: -INFINITY,
        nodes: 0,
    };

    let mut root_moves = MoveList::new();
    generate_legal(pos, &mut root_moves);

    if root_moves.is_empty() {
        result.score = if is_in_check(pos, pos.side_to_move()) {
            -MATE_SCORE
        } else {
            0
        };
        return result;
    }

    // Killers and history reset per call; the TT persists across calls.
    let mut ctx = SearchContext::new();
    let root_hash = pos.hash();
    // Seed the path so in-search repetition can see the root position.
    ctx.path_hashes[0] = root_hash;

    for d in 1..=depth as i32 {
        ctx.nodes = 0;

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best_score = -INFINITY;
        let mut best_move = root_moves.get(0);

        // Order the root with the previous iteration's TT move on top.
        let hash_move = tt.probe(root_hash, 0, alpha, beta, 0).best;
        let mut scores = [0i32; MoveList::CAPACITY];
        for i in 0..root_moves.len() {
            scores[i] = score_move(pos, root_moves.get(i), &ctx, 0, hash_move);
        }
        order_moves(&mut root_moves, &mut scores);

        for i in 0..root_moves.len() {
            let m = root_moves.get(i);
            pos.apply(m);

            let score = if i == 0 {
                -negamax(pos, d - 1, -beta, -alpha, 1, false, noise, &mut ctx, tt)
            } else {
                let mut s =
                    -negamax(pos, d - 1, -alpha - 1, -alpha, 1, false, noise, &mut ctx, tt);
                if s > alpha && s < beta {
                    s = -negamax(pos, d - 1, -beta, -alpha, 1, false, noise, &mut ctx, tt);
                }
                s
            };

            pos.undo(m);

            if score > best_score {
                best_score = score;
                best_move = m;
            }
            if score > alpha {
                alpha = score;
            }
        }

        result.best_move = best_move;
        result.score = best_score;
        result.nodes += ctx.nodes;

        tt.store(root_hash, best_score, d, best_move, Bound::Exact, 0);

        debug!(
            depth = d,
            score = best_score,
            nodes = ctx.nodes,
            best = %best_move,
            "search iteration finished"
        );
    }

    result
}

#[allow(clippy::too_many_arguments)]
fn negamax(
    pos: &mut Position,
    mut depth: i32,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    no_null: bool,
    noise: i32,
    ctx: &mut SearchContext,
    tt: &TranspositionTable,
) -> i32 {
    let us = pos.side_to_move();
    let in_check = is_in_check(pos, us);

    // Horizon, with a check extension: never evaluate while in check.
    if depth <= 0 {
        if !in_check {
            return quiescence(pos, alpha, beta, noise, ctx);
        }
        depth = 1;
    }

    ctx.nodes += 1;

    if ply >= MAX_PLY {
        return quiescence(pos, alpha, beta, noise, ctx);
    }

    let is_pv = beta - alpha > 1;

    // In-search repetition: the same position earlier on this path (stride
    // two keeps the side to move identical) is a draw.
    let hash = pos.hash();
    let mut back = ply as i32 - 2;
    while back >= 0 {
        if ctx.path_hashes[back as usize] == hash {
            return 0;
        }
        back -= 2;
    }
    ctx.path_hashes[ply] = hash;

    if pos.halfmove_clock() >= 100 || pos.is_insufficient_material() {
        return 0;
    }

    // Transposition table: the stored move always helps ordering; the
    // stored score is returned outright when depth and bound allow it.
    let lookup = tt.probe(hash, depth, alpha, beta, ply);
    if let Some(score) = lookup.score {
        return score;
    }
    let hash_move = lookup.best;

    // Null-move pruning. Skipped in check (the null move would be illegal),
    // in PV nodes, right after another null move, and without non-pawn
    // material (zugzwang).
    if !in_check && depth >= 3 && !is_pv && !no_null && pos.has_non_pawn_material(us) {
        pos.apply_null();
        let null_score = -negamax(
            pos,
            depth - 1 - NULL_MOVE_REDUCTION,
            -beta,
            -beta + 1,
            ply + 1,
            true,
            noise,
            ctx,
            tt,
        );
        pos.undo_null();

        if null_score >= beta {
            return beta;
        }
    }

    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);

    if moves.is_empty() {
        // Mate scores prefer shorter mates: the deeper the mate, the lower.
        return if in_check { -MATE_SCORE + ply as i32 } else { 0 };
    }

    let mut scores = [0i32; MoveList::CAPACITY];
    for i in 0..moves.len() {
        scores[i] = score_move(pos, moves.get(i), ctx, ply, hash_move);
    }
    order_moves(&mut moves, &mut scores);

    let mut best = -INFINITY;
    let mut best_move = moves.get(0);
    let mut flag = Bound::Upper;

    for i in 0..moves.len() {
        let m = moves.get(i);
        let is_capture = m.is_capture();
        let is_killer =
            ply < 64 && (m == ctx.killers[ply][0] || m == ctx.killers[ply][1]);

        pos.apply(m);

        // Checking moves never get reduced; they need the full look.
        let gives_check = is_in_check(pos, pos.side_to_move());

        let reduction = if i >= 3
            && depth >= 3
            && !in_check
            && !is_capture
            && !is_killer
            && !gives_check
        {
            if i >= 6 {
                2
            } else {
                1
            }
        } else {
            0
        };

        let score = if i == 0 {
            -negamax(pos, depth - 1, -beta, -alpha, ply + 1, false, noise, ctx, tt)
        } else {
            // Zero-window probe, possibly reduced.
            let mut s = -negamax(
                pos,
                depth - 1 - reduction,
                -alpha - 1,
                -alpha,
                ply + 1,
                false,
                noise,
                ctx,
                tt,
            );
            // The reduced search beat alpha: verify at full depth.
            if reduction > 0 && s > alpha {
                s = -negamax(pos, depth - 1, -alpha - 1, -alpha, ply + 1, false, noise, ctx, tt);
            }
            // Zero-window fail-high inside the window: full re-search.
            if s > alpha && s < beta {
                s = -negamax(pos, depth - 1, -beta, -alpha, ply + 1, false, noise, ctx, tt);
            }
            s
        };

        pos.undo(m);

        if score > best {
            best = score;
            best_move = m;
        }
        if score > alpha {
            alpha = score;
            flag = Bound::Exact;
        }
        if alpha >= beta {
            flag = Bound::Lower;

            if !is_capture && ply < 64 {
                if m != ctx.killers[ply][0] {
                    ctx.killers[ply][1] = ctx.killers[ply][0];
                    ctx.killers[ply][0] = m;
                }
                let entry =
                    &mut ctx.history[us.index()][m.from() as usize][m.to() as usize];
                *entry = (*entry + depth * depth).min(1_000_000);
            }

            break;
        }
    }

    tt.store(hash, best, depth, best_move, flag, ply);

    best
}
