//! # Position Representation and Make/Unmake
//!
//! ## Overview
//!
//! A [`Position`] carries two redundant views of the board that must agree at
//! every square:
//!
//! - **Bitboards** - one 64-bit set per (color, piece kind), plus cached
//!   per-color and combined occupancy unions. These drive move generation
//!   and attack queries.
//! - **Mailbox** - a 64-entry `square → piece` array for O(1) "what is
//!   standing here" lookups during make/unmake and capture scoring.
//!
//! Alongside the board sit side-to-move, the four castling rights, the
//! en-passant target (live for exactly one ply after a double push), the
//! halfmove clock, the fullmove counter, and an incrementally maintained
//! Zobrist hash.
//!
//! ## Make/Unmake Discipline
//!
//! `apply` mutates the position in place and pushes the *irreversible* state
//! (captured piece, prior castling rights, en-passant square, clocks, hash)
//! onto a fixed-capacity history stack; `undo` pops it and must leave every
//! field bit-identical to the pre-`apply` state. The search leans on this
//! hard: millions of apply/undo pairs per request, strictly stack-ordered.
//!
//! A null move - flip side, drop the en-passant target, touch nothing on the
//! board - uses the same history stack and is the primitive behind null-move
//! pruning.

use crate::bitboard::{square_bb, Bitboard};
use crate::error::FenError;
use crate::moves::{Move, MoveFlag};
use crate::types::{
    file_of, make_square, parse_square, square_name, CastlingRights, Color, Piece, PieceKind,
    Square, NO_SQUARE,
};
use crate::zobrist;
use std::fmt;

/// FEN of the standard initial position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Depth of the undo stack. Bounded by search depth plus quiescence, far
/// below this.
const MAX_HISTORY: usize = 256;

/// Irreversible state saved before each `apply`, restored by `undo`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct HistoryFrame {
    captured: Option<Piece>,
    castling: CastlingRights,
    ep_square: Square,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
}

impl HistoryFrame {
    const EMPTY: HistoryFrame = HistoryFrame {
        captured: None,
        castling: CastlingRights::NONE,
        ep_square: NO_SQUARE,
        halfmove_clock: 0,
        fullmove_number: 1,
        hash: 0,
    };
}

/// Full game state for one position, mutated in place by `apply`/`undo`.
#[derive(Clone)]
pub struct Position {
    pub(crate) pieces: [[Bitboard; PieceKind::COUNT]; 2],
    pub(crate) occupancy: [Bitboard; 2],
    pub(crate) occupancy_all: Bitboard,
    mailbox: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    ep_square: Square,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    ply: usize,
    history: Box<[HistoryFrame; MAX_HISTORY]>,
}

impl Position {
    fn empty() -> Position {
        Position {
            pieces: [[Bitboard::EMPTY; PieceKind::COUNT]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            occupancy_all: Bitboard::EMPTY,
            mailbox: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            ep_square: NO_SQUARE,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            ply: 0,
            history: Box::new([HistoryFrame::EMPTY; MAX_HISTORY]),
        }
    }

    /// The standard initial position.
    pub fn startpos() -> Position {
        Position::from_fen(START_FEN).expect("start position FEN is well-formed")
    }

    /// Parse a six-field FEN. Bitboards, mailbox, and hash are rebuilt from
    /// scratch.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount {
                found: fields.len(),
            });
        }

        let mut pos = Position::empty();

        // Field 1: piece placement, ranks 8 down to 1.
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount { found: ranks.len() });
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    if run == 0 || run > 8 {
                        return Err(FenError::BadPiece(c));
                    }
                    file += run as u8;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::BadPiece(c))?;
                    if file >= 8 {
                        return Err(FenError::RankWidth { rank: rank + 1 });
                    }
                    pos.put_piece(make_square(file, rank), piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::RankWidth { rank: rank + 1 });
                }
            }
            if file != 8 {
                return Err(FenError::RankWidth { rank: rank + 1 });
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = pos.pieces[color.index()][PieceKind::King.index()].count();
            if kings != 1 {
                return Err(FenError::KingCount(kings));
            }
            let pawns = pos.pieces[color.index()][PieceKind::Pawn.index()];
            if (pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).any() {
                return Err(FenError::PawnOnBackRank);
            }
        }

        // Field 2: active color.
        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadColor(other.to_string())),
        };

        // Field 3: castling rights.
        if fields[2] != "-" {
            if fields[2].is_empty() {
                return Err(FenError::BadCastling(fields[2].to_string()));
            }
            for c in fields[2].chars() {
                match c {
                    'K' => pos.castling.white_king_side = true,
                    'Q' => pos.castling.white_queen_side = true,
                    'k' => pos.castling.black_king_side = true,
                    'q' => pos.castling.black_queen_side = true,
                    _ => return Err(FenError::BadCastling(fields[2].to_string())),
                }
            }
        }

        // Field 4: en-passant target.
        if fields[3] != "-" {
            pos.ep_square = parse_square(fields[3])
                .ok_or_else(|| FenError::BadEnPassant(fields[3].to_string()))?;
        }

        // Fields 5-6: clocks.
        pos.halfmove_clock = fields[4]
            .parse()
            .map_err(|_| FenError::BadClock(fields[4].to_string()))?;
        pos.fullmove_number = fields[5]
            .parse()
            .map_err(|_| FenError::BadClock(fields[5].to_string()))?;

        pos.hash = pos.recompute_hash();
        Ok(pos)
    }

    /// Emit the position as a six-field FEN (exact inverse of `from_fen`).
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.mailbox[make_square(file, rank) as usize] {
                    None => empty += 1,
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        fen.push_str(&self.castling.to_fen_field());

        fen.push(' ');
        if self.ep_square == NO_SQUARE {
            fen.push('-');
        } else {
            fen.push_str(&square_name(self.ep_square));
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    // ---- Accessors ----

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn ep_square(&self) -> Square {
        self.ep_square
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq as usize]
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.index()]
    }

    #[inline]
    pub fn occupancy_all(&self) -> Bitboard {
        self.occupancy_all
    }

    /// Square of the king of `color`. Positions always carry exactly one
    /// king per side (enforced at FEN parse).
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces[color.index()][PieceKind::King.index()].lsb()
    }

    /// Whether `color` still owns anything beyond pawns and the king - the
    /// guard zugzwang-prone endgames use to switch off null-move pruning.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let c = color.index();
        (self.pieces[c][PieceKind::Knight.index()]
            | self.pieces[c][PieceKind::Bishop.index()]
            | self.pieces[c][PieceKind::Rook.index()]
            | self.pieces[c][PieceKind::Queen.index()])
        .any()
    }

    /// K vs K, K+N vs K, or K+B vs K (either way round): no mate can be
    /// forced, the game is drawn.
    pub fn is_insufficient_material(&self) -> bool {
        let white = self.occupancy[Color::White.index()].count();
        let black = self.occupancy[Color::Black.index()].count();

        if white == 1 && black == 1 {
            return true;
        }

        let minor = |color: Color| {
            self.pieces(color, PieceKind::Knight).any() || self.pieces(color, PieceKind::Bishop).any()
        };
        if white == 2 && black == 1 && minor(Color::White) {
            return true;
        }
        if white == 1 && black == 2 && minor(Color::Black) {
            return true;
        }

        false
    }

    /// Recompute the Zobrist hash from scratch. `apply`/`undo` maintain the
    /// hash incrementally; this is the oracle used at FEN load and by tests.
    pub fn recompute_hash(&self) -> u64 {
        let mut hash = 0u64;
        for sq in 0..64u8 {
            if let Some(piece) = self.mailbox[sq as usize] {
                hash ^= zobrist::piece_key(piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= zobrist::side_key();
        }
        hash ^= zobrist::castling_keys(self.castling.bits());
        if self.ep_square != NO_SQUARE {
            hash ^= zobrist::ep_key(file_of(self.ep_square));
        }
        hash
    }

    /// Debugging aid: mailbox and bitboards agree at every square, and the
    /// occupancy caches equal the union of the per-kind boards.
    pub fn is_consistent(&self) -> bool {
        let mut white = Bitboard::EMPTY;
        let mut black = Bitboard::EMPTY;
        for kind_idx in 0..PieceKind::COUNT {
            white |= self.pieces[Color::White.index()][kind_idx];
            black |= self.pieces[Color::Black.index()][kind_idx];
        }
        if white != self.occupancy[Color::White.index()]
            || black != self.occupancy[Color::Black.index()]
            || (white | black) != self.occupancy_all
            || (white & black).any()
        {
            return false;
        }

        for sq in 0..64u8 {
            let on_boards = (0..2).find_map(|c| {
                (0..PieceKind::COUNT).find_map(|k| {
                    if self.pieces[c][k].contains(sq) {
                        PieceKind::from_index(k).map(|kind| Piece {
                            kind,
                            color: if c == 0 { Color::White } else { Color::Black },
                        })
                    } else {
                        None
                    }
                })
            });
            if on_boards != self.mailbox[sq as usize] {
                return false;
            }
        }
        true
    }

    // ---- Board surgery (keeps bitboards, mailbox, and hash in sync) ----

    fn put_piece(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.mailbox[sq as usize].is_none(), "square not empty");
        let bb = square_bb(sq);
        self.pieces[piece.color.index()][piece.kind.index()] |= bb;
        self.occupancy[piece.color.index()] |= bb;
        self.occupancy_all |= bb;
        self.mailbox[sq as usize] = Some(piece);
        self.hash ^= zobrist::piece_key(piece, sq);
    }

    fn remove_piece(&mut self, sq: Square) {
        let Some(piece) = self.mailbox[sq as usize] else {
            debug_assert!(false, "no piece to remove on {}", square_name(sq));
            return;
        };
        let bb = square_bb(sq);
        self.pieces[piece.color.index()][piece.kind.index()] ^= bb;
        self.occupancy[piece.color.index()] ^= bb;
        self.occupancy_all ^= bb;
        self.mailbox[sq as usize] = None;
        self.hash ^= zobrist::piece_key(piece, sq);
    }

    fn move_piece(&mut self, from: Square, to: Square) {
        let Some(piece) = self.mailbox[from as usize] else {
            debug_assert!(false, "no piece to move on {}", square_name(from));
            return;
        };
        self.remove_piece(from);
        self.put_piece(to, piece);
    }

    // ---- Make / unmake ----

    /// Play a move. The move must come from this position's legal or
    /// pseudo-legal move list; every `apply` must be matched by an `undo`.
    pub fn apply(&mut self, m: Move) {
        let from = m.from();
        let to = m.to();
        let us = self.side_to_move;
        let them = us.opponent();

        debug_assert!(self.ply < MAX_HISTORY, "history stack overflow");
        let frame = self.ply;
        self.history[frame] = HistoryFrame {
            captured: None,
            castling: self.castling,
            ep_square: self.ep_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        };
        self.ply += 1;

        // The en-passant window closes after one ply no matter what.
        if self.ep_square != NO_SQUARE {
            self.hash ^= zobrist::ep_key(file_of(self.ep_square));
            self.ep_square = NO_SQUARE;
        }

        let Some(moving) = self.mailbox[from as usize] else {
            debug_assert!(false, "apply from empty square {}", square_name(from));
            return;
        };

        // Castling rights: king moves clear both of ours, rook moves off a
        // home corner clear that side, and capturing a rook on its home
        // corner clears the opponent's.
        let old_castling = self.castling;
        match moving.kind {
            PieceKind::King => match us {
                Color::White => {
                    self.castling.white_king_side = false;
                    self.castling.white_queen_side = false;
                }
                Color::Black => {
                    self.castling.black_king_side = false;
                    self.castling.black_queen_side = false;
                }
            },
            PieceKind::Rook => match (us, from) {
                (Color::White, 0) => self.castling.white_queen_side = false,
                (Color::White, 7) => self.castling.white_king_side = false,
                (Color::Black, 56) => self.castling.black_queen_side = false,
                (Color::Black, 63) => self.castling.black_king_side = false,
                _ => {}
            },
            _ => {}
        }
        if let Some(victim) = self.mailbox[to as usize] {
            if victim.kind == PieceKind::Rook {
                match to {
                    0 => self.castling.white_queen_side = false,
                    7 => self.castling.white_king_side = false,
                    56 => self.castling.black_queen_side = false,
                    63 => self.castling.black_king_side = false,
                    _ => {}
                }
            }
        }
        if old_castling != self.castling {
            self.hash ^= zobrist::castling_keys(old_castling.bits() ^ self.castling.bits());
        }

        match m.flag() {
            MoveFlag::Quiet => self.move_piece(from, to),
            MoveFlag::DoublePush => {
                self.move_piece(from, to);
                let ep = match us {
                    Color::White => from + 8,
                    Color::Black => from - 8,
                };
                self.ep_square = ep;
                self.hash ^= zobrist::ep_key(file_of(ep));
            }
            MoveFlag::KingCastle => {
                self.move_piece(from, to);
                match us {
                    Color::White => self.move_piece(7, 5),   // h1 -> f1
                    Color::Black => self.move_piece(63, 61), // h8 -> f8
                }
            }
            MoveFlag::QueenCastle => {
                self.move_piece(from, to);
                match us {
                    Color::White => self.move_piece(0, 3),   // a1 -> d1
                    Color::Black => self.move_piece(56, 59), // a8 -> d8
                }
            }
            MoveFlag::EnPassant => {
                self.move_piece(from, to);
                let victim_sq = match us {
                    Color::White => to - 8,
                    Color::Black => to + 8,
                };
                self.history[frame].captured = self.mailbox[victim_sq as usize];
                self.remove_piece(victim_sq);
            }
            MoveFlag::PromoKnight
            | MoveFlag::PromoBishop
            | MoveFlag::PromoRook
            | MoveFlag::PromoQueen => {
                self.remove_piece(from);
                if let Some(kind) = m.promotion_kind() {
                    self.put_piece(to, Piece::new(kind, us));
                }
            }
            MoveFlag::PromoCaptureKnight
            | MoveFlag::PromoCaptureBishop
            | MoveFlag::PromoCaptureRook
            | MoveFlag::PromoCaptureQueen => {
                self.history[frame].captured = self.mailbox[to as usize];
                self.remove_piece(to);
                self.remove_piece(from);
                if let Some(kind) = m.promotion_kind() {
                    self.put_piece(to, Piece::new(kind, us));
                }
            }
            MoveFlag::Capture => {
                self.history[frame].captured = self.mailbox[to as usize];
                self.remove_piece(to);
                self.move_piece(from, to);
            }
        }

        // Halfmove clock resets on pawn moves and every flavour of capture.
        if moving.kind == PieceKind::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = them;
        self.hash ^= zobrist::side_key();
    }

    /// Revert the most recent `apply`. Restores every field - bitboards,
    /// mailbox, rights, clocks, hash - bit-identical to the prior state.
    pub fn undo(&mut self, m: Move) {
        let from = m.from();
        let to = m.to();

        self.side_to_move = self.side_to_move.opponent();
        let us = self.side_to_move;
        let them = us.opponent();

        debug_assert!(self.ply > 0, "undo with empty history");
        self.ply -= 1;
        let frame = self.history[self.ply];

        match m.flag() {
            MoveFlag::Quiet | MoveFlag::DoublePush => self.move_piece(to, from),
            MoveFlag::KingCastle => {
                self.move_piece(to, from);
                match us {
                    Color::White => self.move_piece(5, 7),   // f1 -> h1
                    Color::Black => self.move_piece(61, 63), // f8 -> h8
                }
            }
            MoveFlag::QueenCastle => {
                self.move_piece(to, from);
                match us {
                    Color::White => self.move_piece(3, 0),   // d1 -> a1
                    Color::Black => self.move_piece(59, 56), // d8 -> a8
                }
            }
            MoveFlag::EnPassant => {
                self.move_piece(to, from);
                let victim_sq = match us {
                    Color::White => to - 8,
                    Color::Black => to + 8,
                };
                self.put_piece(victim_sq, Piece::new(PieceKind::Pawn, them));
            }
            MoveFlag::PromoKnight
            | MoveFlag::PromoBishop
            | MoveFlag::PromoRook
            | MoveFlag::PromoQueen => {
                self.remove_piece(to);
                self.put_piece(from, Piece::new(PieceKind::Pawn, us));
            }
            MoveFlag::PromoCaptureKnight
            | MoveFlag::PromoCaptureBishop
            | MoveFlag::PromoCaptureRook
            | MoveFlag::PromoCaptureQueen => {
                self.remove_piece(to);
                if let Some(victim) = frame.captured {
                    self.put_piece(to, victim);
                }
                self.put_piece(from, Piece::new(PieceKind::Pawn, us));
            }
            MoveFlag::Capture => {
                self.move_piece(to, from);
                if let Some(victim) = frame.captured {
                    self.put_piece(to, victim);
                }
            }
        }

        self.castling = frame.castling;
        self.ep_square = frame.ep_square;
        self.halfmove_clock = frame.halfmove_clock;
        self.fullmove_number = frame.fullmove_number;
        self.hash = frame.hash;
    }

    /// Pass the move to the opponent: flip side to move, drop any en-passant
    /// target. Piece placement never changes. Search-only primitive.
    pub fn apply_null(&mut self) {
        debug_assert!(self.ply < MAX_HISTORY, "history stack overflow");
        self.history[self.ply] = HistoryFrame {
            captured: None,
            castling: self.castling,
            ep_square: self.ep_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        };
        self.ply += 1;

        if self.ep_square != NO_SQUARE {
            self.hash ^= zobrist::ep_key(file_of(self.ep_square));
            self.ep_square = NO_SQUARE;
        }
        self.side_to_move = self.side_to_move.opponent();
        self.hash ^= zobrist::side_key();
    }

    /// Revert the most recent `apply_null`.
    pub fn undo_null(&mut self) {
        self.side_to_move = self.side_to_move.opponent();

        debug_assert!(self.ply > 0, "undo_null with empty history");
        self.ply -= 1;
        let frame = self.history[self.ply];
        self.ep_square = frame.ep_square;
        self.halfmove_clock = frame.halfmove_clock;
        self.fullmove_number = frame.fullmove_number;
        self.hash = frame.hash;
    }
}

impl fmt::Display for Position {
    /// Board grid, rank 8 at the top, FEN letters for pieces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                match self.mailbox[make_square(file, rank) as usize] {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(
            f,
            "{} to move",
            match self.side_to_move {
                Color::White => "white",
                Color::Black => "black",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveFlag;
    use crate::types::parse_square;

    fn sq(name: &str) -> Square {
        parse_square(name).expect("test square")
    }

    /// Observable state snapshot for round-trip comparisons.
    fn snapshot(pos: &Position) -> (String, u64) {
        (pos.to_fen(), pos.hash())
    }

    #[test]
    fn test_startpos_fen_round_trip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), START_FEN);
        assert!(pos.is_consistent());
        assert_eq!(pos.hash(), pos.recompute_hash());
    }

    #[test]
    fn test_from_fen_rejects_malformed_input() {
        assert!(Position::from_fen("").is_err());
        assert!(Position::from_fen("not a fen at all").is_err());
        // five fields
        assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - - 0").is_err());
        // seven ranks
        assert!(Position::from_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        // rank too wide
        assert!(
            Position::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err(),
            "digit 9 is invalid"
        );
        assert!(Position::from_fen("ppppppppp/8/8/8/8/8/8/8 w - - 0 1").is_err());
        // bad color / castling / ep / clock
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 x KQkq - 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KQxq - 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e9 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1").is_err());
        // no kings
        assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
        // pawn parked on a back rank
        assert!(Position::from_fen("4k2P/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
    }

    #[test]
    fn test_fen_round_trip_preserves_all_fields() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 41",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
        ];
        for fen in fens {
            let pos = Position::from_fen(fen).expect("valid FEN");
            assert_eq!(pos.to_fen(), fen);
            assert!(pos.is_consistent(), "consistency for {fen}");
        }
    }

    #[test]
    fn test_double_push_sets_en_passant_target() {
        let mut pos = Position::startpos();
        pos.apply(Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush));

        assert_eq!(
            pos.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(pos.ep_square(), sq("e3"));
        assert_eq!(pos.hash(), pos.recompute_hash());
    }

    #[test]
    fn test_apply_undo_restores_exact_state() {
        let mut pos = Position::startpos();
        let before = snapshot(&pos);

        let m = Move::new(sq("g1"), sq("f3"), MoveFlag::Quiet);
        pos.apply(m);
        assert_ne!(snapshot(&pos), before);
        pos.undo(m);

        assert_eq!(snapshot(&pos), before);
        assert!(pos.is_consistent());
    }

    #[test]
    fn test_capture_undo_restores_victim() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .expect("valid FEN");
        let before = snapshot(&pos);

        let m = Move::new(sq("e4"), sq("d5"), MoveFlag::Capture);
        pos.apply(m);
        assert_eq!(pos.halfmove_clock(), 0, "capture resets the clock");
        assert!(pos.piece_on(sq("d5")).is_some());
        assert!(pos.piece_on(sq("e4")).is_none());
        pos.undo(m);

        assert_eq!(snapshot(&pos), before);
        assert!(pos.is_consistent());
    }

    #[test]
    fn test_white_kingside_castle() {
        let mut pos =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid FEN");
        let before = snapshot(&pos);

        let m = Move::new(sq("e1"), sq("g1"), MoveFlag::KingCastle);
        pos.apply(m);
        assert_eq!(pos.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
        assert_eq!(pos.hash(), pos.recompute_hash());

        pos.undo(m);
        assert_eq!(snapshot(&pos), before);
    }

    #[test]
    fn test_black_queenside_castle() {
        let mut pos =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").expect("valid FEN");
        let m = Move::new(sq("e8"), sq("c8"), MoveFlag::QueenCastle);
        pos.apply(m);
        assert_eq!(pos.to_fen(), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2");
    }

    #[test]
    fn test_rook_move_clears_one_castling_right() {
        let mut pos =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid FEN");
        pos.apply(Move::new(sq("h1"), sq("h2"), MoveFlag::Quiet));
        assert_eq!(pos.castling().to_fen_field(), "Qkq");
        assert_eq!(pos.hash(), pos.recompute_hash());
    }

    #[test]
    fn test_rook_capture_clears_opponent_castling_right() {
        let mut pos =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid FEN");
        pos.apply(Move::new(sq("a1"), sq("a8"), MoveFlag::Capture));
        assert_eq!(
            pos.castling().to_fen_field(),
            "Kk",
            "both queenside rights go: ours moved, theirs was captured"
        );
        assert_eq!(pos.hash(), pos.recompute_hash());
    }

    #[test]
    fn test_en_passant_capture_removes_bypassed_pawn() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .expect("valid FEN");
        let before = snapshot(&pos);

        let m = Move::new(sq("e5"), sq("d6"), MoveFlag::EnPassant);
        pos.apply(m);
        assert!(pos.piece_on(sq("d5")).is_none(), "bypassed pawn removed");
        assert!(pos.piece_on(sq("d6")).is_some());
        assert_eq!(pos.ep_square(), NO_SQUARE);
        assert_eq!(pos.hash(), pos.recompute_hash());

        pos.undo(m);
        assert_eq!(snapshot(&pos), before);
        assert!(pos.is_consistent());
    }

    #[test]
    fn test_promotion_and_undo() {
        let mut pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("valid FEN");
        let before = snapshot(&pos);

        let m = Move::new(sq("a7"), sq("a8"), MoveFlag::PromoQueen);
        pos.apply(m);
        assert_eq!(
            pos.piece_on(sq("a8")),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        assert_eq!(pos.halfmove_clock(), 0, "promotion is a pawn move");
        assert_eq!(pos.hash(), pos.recompute_hash());

        pos.undo(m);
        assert_eq!(snapshot(&pos), before);
    }

    #[test]
    fn test_promotion_capture_and_undo() {
        let mut pos = Position::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("valid FEN");
        let before = snapshot(&pos);

        let m = Move::new(sq("a7"), sq("b8"), MoveFlag::PromoCaptureKnight);
        pos.apply(m);
        assert_eq!(
            pos.piece_on(sq("b8")),
            Some(Piece::new(PieceKind::Knight, Color::White))
        );

        pos.undo(m);
        assert_eq!(snapshot(&pos), before);
        assert_eq!(
            pos.piece_on(sq("b8")),
            Some(Piece::new(PieceKind::Rook, Color::Black))
        );
    }

    #[test]
    fn test_null_move_round_trip() {
        let mut pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .expect("valid FEN");
        let before = snapshot(&pos);

        pos.apply_null();
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.ep_square(), NO_SQUARE, "null move clears ep target");
        assert_eq!(pos.hash(), pos.recompute_hash());

        pos.undo_null();
        assert_eq!(snapshot(&pos), before);
        assert_eq!(pos.side_to_move(), Color::Black);
    }

    #[test]
    fn test_halfmove_clock_counts_quiet_moves() {
        let mut pos = Position::startpos();
        pos.apply(Move::new(sq("g1"), sq("f3"), MoveFlag::Quiet));
        assert_eq!(pos.halfmove_clock(), 1);
        pos.apply(Move::new(sq("g8"), sq("f6"), MoveFlag::Quiet));
        assert_eq!(pos.halfmove_clock(), 2);
        assert_eq!(pos.fullmove_number(), 2, "incremented after black's move");
        pos.apply(Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush));
        assert_eq!(pos.halfmove_clock(), 0, "pawn move resets");
    }

    #[test]
    fn test_transpositions_hash_identically() {
        // 1.Nf3 Nf6 2.Ng1 Ng8 returns to the start position.
        let mut pos = Position::startpos();
        let start_hash = pos.hash();

        for (from, to) in [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")] {
            pos.apply(Move::new(sq(from), sq(to), MoveFlag::Quiet));
        }
        assert_eq!(
            pos.hash(),
            start_hash,
            "same placement, side, rights and ep target must hash equal"
        );
    }

    #[test]
    fn test_different_ep_state_hashes_differently() {
        let with_ep =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .expect("valid FEN");
        let without_ep =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
                .expect("valid FEN");
        assert_ne!(with_ep.hash(), without_ep.hash());
    }

    #[test]
    fn test_insufficient_material_cases() {
        let insufficient = [
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/3NK3 w - - 0 1",
            "4k3/8/8/8/8/8/8/3BK3 b - - 0 1",
            "3nk3/8/8/8/8/8/8/4K3 w - - 0 1",
        ];
        for fen in insufficient {
            let pos = Position::from_fen(fen).expect("valid FEN");
            assert!(pos.is_insufficient_material(), "{fen}");
        }

        let sufficient = [
            START_FEN,
            "4k3/8/8/8/8/8/8/3RK3 w - - 0 1",
            "4k3/7p/8/8/8/8/8/4K3 w - - 0 1",
            "3nk3/8/8/8/8/8/8/3NK3 w - - 0 1",
        ];
        for fen in sufficient {
            let pos = Position::from_fen(fen).expect("valid FEN");
            assert!(!pos.is_insufficient_material(), "{fen}");
        }
    }

    #[test]
    fn test_has_non_pawn_material() {
        let pos = Position::from_fen("4k3/pppppppp/8/8/8/8/PPPPPPPP/4K3 w - - 0 1")
            .expect("valid FEN");
        assert!(!pos.has_non_pawn_material(Color::White));
        assert!(!pos.has_non_pawn_material(Color::Black));

        let pos = Position::startpos();
        assert!(pos.has_non_pawn_material(Color::White));
        assert!(pos.has_non_pawn_material(Color::Black));
    }
}
