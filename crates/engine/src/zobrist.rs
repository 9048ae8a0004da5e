//! # Zobrist Keys
//!
//! A position's hash is the XOR of pseudo-random 64-bit keys: one per
//! (color, piece kind, square) occupant, one for black-to-move, one per
//! castling-right flag, and one per en-passant file. XOR is its own inverse,
//! so `apply`/`undo` maintain the hash incrementally by toggling the keys of
//! whatever changed. Two move sequences reaching the same placement, side,
//! castling rights, and en-passant state therefore produce the same hash -
//! which is exactly what the transposition table and repetition detection
//! key off.
//!
//! The keys come from a fixed-seed `StdRng` so hashes are stable across
//! processes and test runs.

use crate::types::{Color, Piece, PieceKind, Square};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct ZobristKeys {
    pieces: [[[u64; 64]; PieceKind::COUNT]; 2],
    black_to_move: u64,
    castling: [u64; 4],
    ep_file: [u64; 8],
}

static KEYS: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(0x9E37_79B9_7F4A_7C15);
    let mut keys = ZobristKeys {
        pieces: [[[0; 64]; PieceKind::COUNT]; 2],
        black_to_move: 0,
        castling: [0; 4],
        ep_file: [0; 8],
    };
    for color in &mut keys.pieces {
        for kind in color.iter_mut() {
            for key in kind.iter_mut() {
                *key = rng.gen();
            }
        }
    }
    keys.black_to_move = rng.gen();
    for key in &mut keys.castling {
        *key = rng.gen();
    }
    for key in &mut keys.ep_file {
        *key = rng.gen();
    }
    keys
});

/// Key for a piece standing on a square.
#[inline]
pub fn piece_key(piece: Piece, sq: Square) -> u64 {
    KEYS.pieces[piece.color.index()][piece.kind.index()][sq as usize]
}

/// Key toggled in when black is to move.
#[inline]
pub fn side_key() -> u64 {
    KEYS.black_to_move
}

/// Key for one castling-right flag (0 = white kingside ... 3 = black
/// queenside, matching `CastlingRights::bits`).
#[inline]
pub fn castling_key(flag: usize) -> u64 {
    KEYS.castling[flag]
}

/// Combined key for a set of castling-right flags given as a 4-bit mask.
#[inline]
pub fn castling_keys(bits: u8) -> u64 {
    let mut hash = 0;
    for flag in 0..4 {
        if bits & (1 << flag) != 0 {
            hash ^= KEYS.castling[flag];
        }
    }
    hash
}

/// Key for an en-passant target on the given file.
#[inline]
pub fn ep_key(file: u8) -> u64 {
    KEYS.ep_file[file as usize]
}

/// Force key generation (startup warm-up).
pub fn init() {
    Lazy::force(&KEYS);
}
