//! Error types for the engine
//!
//! Parse and request errors surface as values; nothing in the engine panics
//! across the API boundary. Internal invariant violations (mailbox/bitboard
//! disagreement, bad undo) are `debug_assert!`s - programmer bugs, fail-fast
//! in debug builds.

use thiserror::Error;

/// Reasons a FEN string can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN requires six space-separated fields.
    #[error("expected 6 FEN fields, found {found}")]
    FieldCount { found: usize },

    /// Piece placement must describe exactly eight ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    RankCount { found: usize },

    /// A rank must describe exactly eight files.
    #[error("rank {rank} does not cover exactly 8 files")]
    RankWidth { rank: u8 },

    /// Unknown character in the piece placement field.
    #[error("invalid piece character {0:?}")]
    BadPiece(char),

    /// Active color must be `w` or `b`.
    #[error("invalid active color {0:?}")]
    BadColor(String),

    /// Castling field must be `-` or a subset of `KQkq`.
    #[error("invalid castling field {0:?}")]
    BadCastling(String),

    /// En-passant field must be `-` or a valid square.
    #[error("invalid en-passant field {0:?}")]
    BadEnPassant(String),

    /// Halfmove clock / fullmove counter must be decimal integers.
    #[error("invalid clock field {0:?}")]
    BadClock(String),

    /// Both sides need exactly one king on the board.
    #[error("{0} kings for one side (expected exactly 1)")]
    KingCount(u32),

    /// Pawns cannot stand on the first or eighth rank.
    #[error("pawn on a back rank")]
    PawnOnBackRank,
}

/// Request-level failures surfaced to the service wrapper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("failed to parse FEN")]
    Fen(#[from] FenError),

    #[error("depth must be between 1 and 20, got {depth}")]
    DepthOutOfRange { depth: u32 },
}
