//! # Move Generation and Legality
//!
//! ## Overview
//!
//! Generation is split in two stages, the classic cheap-then-filter design:
//!
//! 1. **Pseudo-legal generation** walks the side-to-move's bitboards and
//!    emits every move that respects piece movement rules, ignoring whether
//!    it leaves the own king attacked. Leapers intersect their attack
//!    tables with `!friendly`; sliders index the occupancy-keyed tables;
//!    pawns handle pushes, double pushes, promotions, captures, and the
//!    en-passant target; castling is emitted only when the right is alive,
//!    the span is empty, and neither the king's square, the square it
//!    crosses, nor its destination is attacked.
//! 2. **Legality filtering** applies each candidate, asks whether the
//!    mover's king is now attacked, and undoes. Slower than computing pin
//!    rays up front, but trivially correct - and correctness here is load
//!    bearing for everything above it (perft is the oracle that keeps it
//!    honest).
//!
//! `is_square_attacked` answers "could a piece of this color capture on this
//! square" by reverse lookup: place each attacker kind *on the target
//! square* and intersect the resulting attack set with the actual attackers
//! of that kind. One bitboard AND per piece kind, no board scan.

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::moves::{CoordMove, Move, MoveFlag, MoveList};
use crate::position::Position;
use crate::types::{Color, PieceKind, Square, NO_SQUARE};

/// True if any piece of `by` attacks `sq`.
pub fn is_square_attacked(pos: &Position, sq: Square, by: Color) -> bool {
    let occupied = pos.occupancy_all();

    // Pawns: a pawn of `by` attacks sq iff a pawn of the defending color
    // standing on sq would attack it back.
    if (attacks::pawn_attacks(by.opponent(), sq) & pos.pieces(by, PieceKind::Pawn)).any() {
        return true;
    }
    if (attacks::knight_attacks(sq) & pos.pieces(by, PieceKind::Knight)).any() {
        return true;
    }
    if (attacks::king_attacks(sq) & pos.pieces(by, PieceKind::King)).any() {
        return true;
    }

    let diagonal = pos.pieces(by, PieceKind::Bishop) | pos.pieces(by, PieceKind::Queen);
    if (attacks::bishop_attacks(sq, occupied) & diagonal).any() {
        return true;
    }

    let straight = pos.pieces(by, PieceKind::Rook) | pos.pieces(by, PieceKind::Queen);
    if (attacks::rook_attacks(sq, occupied) & straight).any() {
        return true;
    }

    false
}

/// Whether `color`'s king is currently attacked.
#[inline]
pub fn is_in_check(pos: &Position, color: Color) -> bool {
    is_square_attacked(pos, pos.king_square(color), color.opponent())
}

/// Generate every pseudo-legal move for the side to move into `list`.
pub fn generate_pseudo_legal(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();

    generate_pawn_moves(pos, us, list);
    generate_leaper_moves(pos, us, PieceKind::Knight, list);
    generate_slider_moves(pos, us, PieceKind::Bishop, list);
    generate_slider_moves(pos, us, PieceKind::Rook, list);
    generate_slider_moves(pos, us, PieceKind::Queen, list);
    generate_leaper_moves(pos, us, PieceKind::King, list);
    generate_castling(pos, us, list);
}

fn generate_pawn_moves(pos: &Position, us: Color, list: &mut MoveList) {
    let occupied = pos.occupancy_all();
    let enemy = pos.occupancy(us.opponent());
    let ep_square = pos.ep_square();

    let (forward, start_rank, promo_rank) = match us {
        Color::White => (8i8, 1u8, 6u8),
        Color::Black => (-8i8, 6u8, 1u8),
    };

    let mut pawns = pos.pieces(us, PieceKind::Pawn);
    while pawns.any() {
        let from = pawns.pop_lsb();
        let rank = from / 8;
        let single = (from as i8 + forward) as Square;

        // Pushes.
        if !occupied.contains(single) {
            if rank == promo_rank {
                list.push(Move::new(from, single, MoveFlag::PromoKnight));
                list.push(Move::new(from, single, MoveFlag::PromoBishop));
                list.push(Move::new(from, single, MoveFlag::PromoRook));
                list.push(Move::new(from, single, MoveFlag::PromoQueen));
            } else {
                list.push(Move::new(from, single, MoveFlag::Quiet));
                if rank == start_rank {
                    let double = (single as i8 + forward) as Square;
                    if !occupied.contains(double) {
                        list.push(Move::new(from, double, MoveFlag::DoublePush));
                    }
                }
            }
        }

        // Captures, including the en-passant target.
        let mut targets = attacks::pawn_attacks(us, from);
        while targets.any() {
            let to = targets.pop_lsb();
            if enemy.contains(to) {
                if rank == promo_rank {
                    list.push(Move::new(from, to, MoveFlag::PromoCaptureKnight));
                    list.push(Move::new(from, to, MoveFlag::PromoCaptureBishop));
                    list.push(Move::new(from, to, MoveFlag::PromoCaptureRook));
                    list.push(Move::new(from, to, MoveFlag::PromoCaptureQueen));
                } else {
                    list.push(Move::new(from, to, MoveFlag::Capture));
                }
            } else if to == ep_square && ep_square != NO_SQUARE {
                list.push(Move::new(from, to, MoveFlag::EnPassant));
            }
        }
    }
}

fn generate_leaper_moves(pos: &Position, us: Color, kind: PieceKind, list: &mut MoveList) {
    let enemy = pos.occupancy(us.opponent());
    let friendly = pos.occupancy(us);

    let mut pieces = pos.pieces(us, kind);
    while pieces.any() {
        let from = pieces.pop_lsb();
        let table = match kind {
            PieceKind::Knight => attacks::knight_attacks(from),
            _ => attacks::king_attacks(from),
        };
        push_targets(from, table & !friendly, enemy, list);
    }
}

fn generate_slider_moves(pos: &Position, us: Color, kind: PieceKind, list: &mut MoveList) {
    let occupied = pos.occupancy_all();
    let enemy = pos.occupancy(us.opponent());
    let friendly = pos.occupancy(us);

    let mut pieces = pos.pieces(us, kind);
    while pieces.any() {
        let from = pieces.pop_lsb();
        let table = match kind {
            PieceKind::Bishop => attacks::bishop_attacks(from, occupied),
            PieceKind::Rook => attacks::rook_attacks(from, occupied),
            _ => attacks::queen_attacks(from, occupied),
        };
        push_targets(from, table & !friendly, enemy, list);
    }
}

#[inline]
fn push_targets(from: Square, mut targets: Bitboard, enemy: Bitboard, list: &mut MoveList) {
    while targets.any() {
        let to = targets.pop_lsb();
        let flag = if enemy.contains(to) {
            MoveFlag::Capture
        } else {
            MoveFlag::Quiet
        };
        list.push(Move::new(from, to, flag));
    }
}

fn generate_castling(pos: &Position, us: Color, list: &mut MoveList) {
    let occupied = pos.occupancy_all();
    let rights = pos.castling();
    let them = us.opponent();

    // (kingside right, queenside right, e, f, g, d, c, b) per color.
    let (king_side, queen_side, e, f, g, d, c, b) = match us {
        Color::White => (
            rights.white_king_side,
            rights.white_queen_side,
            4u8, 5, 6, 3, 2, 1,
        ),
        Color::Black => (
            rights.black_king_side,
            rights.black_queen_side,
            60u8, 61, 62, 59, 58, 57,
        ),
    };

    if king_side
        && !occupied.contains(f)
        && !occupied.contains(g)
        && !is_square_attacked(pos, e, them)
        && !is_square_attacked(pos, f, them)
        && !is_square_attacked(pos, g, them)
    {
        list.push(Move::new(e, g, MoveFlag::KingCastle));
    }

    if queen_side
        && !occupied.contains(d)
        && !occupied.contains(c)
        && !occupied.contains(b)
        && !is_square_attacked(pos, e, them)
        && !is_square_attacked(pos, d, them)
        && !is_square_attacked(pos, c, them)
    {
        list.push(Move::new(e, c, MoveFlag::QueenCastle));
    }
}

/// Generate the legal moves of the side to move: pseudo-legal candidates
/// filtered by make/test/unmake against the king-safety rule.
pub fn generate_legal(pos: &mut Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let mut pseudo = MoveList::new();
    generate_pseudo_legal(pos, &mut pseudo);

    for &m in pseudo.iter() {
        pos.apply(m);
        if !is_in_check(pos, us) {
            list.push(m);
        }
        pos.undo(m);
    }
}

/// Legal captures only (quiescence feed).
pub fn generate_legal_captures(pos: &mut Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let mut pseudo = MoveList::new();
    generate_pseudo_legal(pos, &mut pseudo);

    for &m in pseudo.iter() {
        if !m.is_capture() {
            continue;
        }
        pos.apply(m);
        if !is_in_check(pos, us) {
            list.push(m);
        }
        pos.undo(m);
    }
}

/// Resolve a coordinate-move string against the legal moves of `pos`.
/// Returns the null move when the text is malformed or matches nothing.
pub fn resolve_coord_move(pos: &mut Position, text: &str) -> Move {
    let Some(coord) = CoordMove::parse(text) else {
        return Move::NULL;
    };
    let mut legal = MoveList::new();
    generate_legal(pos, &mut legal);
    for &m in legal.iter() {
        if coord.matches(m) {
            return m;
        }
    }
    Move::NULL
}

/// Count leaf nodes of the legal move tree to the given depth. The oracle
/// for move-generator correctness: compare against published counts.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut list = MoveList::new();
    generate_legal(pos, &mut list);
    if depth == 1 {
        return list.len() as u64;
    }

    let mut nodes = 0;
    for &m in list.iter() {
        pos.apply(m);
        nodes += perft(pos, depth - 1);
        pos.undo(m);
    }
    nodes
}
