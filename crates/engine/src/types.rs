//! # Core Board Types
//!
//! ## Overview
//!
//! This module defines the primitive vocabulary shared by every other part of
//! the engine: squares, piece kinds, colors, and castling rights. The
//! representations are chosen so they double as array indices - `Color` and
//! `PieceKind` convert losslessly to `usize`, which lets the bitboard arrays,
//! Zobrist key tables, and piece-square tables all be plain fixed-size arrays
//! with no hashing or branching on lookup.
//!
//! ## Square Mapping
//!
//! Squares use the little-endian rank-file mapping standard in bitboard
//! engines:
//!
//! - `a1 = 0`, `h1 = 7`
//! - `a8 = 56`, `h8 = 63`
//!
//! With this layout "north" (toward black's side) is `+8` and a vertical
//! mirror of the board is a single `square ^ 56`, which the evaluation uses
//! to reuse white's piece-square tables for black.

use std::fmt;

/// Board square index, 0-63 in little-endian rank-file order (a1 = 0).
pub type Square = u8;

/// Sentinel for "no square" (used for an absent en-passant target).
pub const NO_SQUARE: Square = 64;

/// Build a square from file (0-7 = a-h) and rank (0-7 = 1-8).
#[inline]
pub fn make_square(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

/// File of a square, 0-7 = a-h.
#[inline]
pub fn file_of(sq: Square) -> u8 {
    sq % 8
}

/// Rank of a square, 0-7 = ranks 1-8.
#[inline]
pub fn rank_of(sq: Square) -> u8 {
    sq / 8
}

/// Mirror a square vertically (a1 <-> a8). Used to flip white-perspective
/// piece-square tables for black.
#[inline]
pub fn mirror(sq: Square) -> Square {
    sq ^ 56
}

/// Render a square in algebraic form (`e4`).
pub fn square_name(sq: Square) -> String {
    if sq >= 64 {
        return "-".to_string();
    }
    let file = (b'a' + file_of(sq)) as char;
    let rank = (b'1' + rank_of(sq)) as char;
    format!("{file}{rank}")
}

/// Parse a two-character algebraic square (`e4`). Returns `None` for
/// anything outside `a1`-`h8`.
pub fn parse_square(s: &str) -> Option<Square> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file > 7 || rank > 7 {
        return None;
    }
    Some(make_square(file, rank))
}

/// The six piece kinds. The discriminants index bitboard arrays, material
/// values, and piece-square tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const COUNT: usize = 6;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<PieceKind> {
        match idx {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Knight),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Queen),
            5 => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Side to move. `index()` is 0 for white and 1 for black so the color can
/// index per-color tables directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// A colored piece as stored in the mailbox.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }

    /// FEN letter for this piece: uppercase white, lowercase black.
    pub fn to_char(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a FEN piece letter.
    pub fn from_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece { kind, color })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The four castling-right flags. Rights only ever get cleared over the
/// course of a game, never restored (undo excepted).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_king_side: true,
        white_queen_side: true,
        black_king_side: true,
        black_queen_side: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        white_king_side: false,
        white_queen_side: false,
        black_king_side: false,
        black_queen_side: false,
    };

    /// Flags as a 4-bit mask (bit 0 = white kingside ... bit 3 = black
    /// queenside), used to index the Zobrist castling keys.
    #[inline]
    pub fn bits(self) -> u8 {
        (self.white_king_side as u8)
            | (self.white_queen_side as u8) << 1
            | (self.black_king_side as u8) << 2
            | (self.black_queen_side as u8) << 3
    }

    /// FEN castling field (`KQkq`, or `-` when no rights remain).
    pub fn to_fen_field(self) -> String {
        let mut s = String::new();
        if self.white_king_side {
            s.push('K');
        }
        if self.white_queen_side {
            s.push('Q');
        }
        if self.black_king_side {
            s.push('k');
        }
        if self.black_queen_side {
            s.push('q');
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}
