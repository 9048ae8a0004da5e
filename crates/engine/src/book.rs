//! # Opening Book
//!
//! A small static table of well-known opening lines, keyed by the first
//! four fields of the FEN (placement, side, castling, en-passant - the
//! clocks are irrelevant to opening theory and are stripped). A hit
//! returns one of the stored coordinate moves uniformly at random, which
//! keeps the engine from playing the identical opening every game without
//! spending a single search node. A miss simply falls through to the
//! search, so an empty book is a perfectly valid configuration - and the
//! deterministic one.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// Book lines: position key → known-good coordinate moves.
type BookMap = HashMap<&'static str, &'static [&'static str]>;

static STANDARD_LINES: Lazy<BookMap> = Lazy::new(|| {
    let mut book = BookMap::new();
    let mut add = |key: &'static str, moves: &'static [&'static str]| {
        book.insert(key, moves);
    };

    // Starting position (white moves).
    add(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
        &["e2e4", "d2d4", "g1f3", "c2c4"],
    );

    // After 1.e4 (black moves).
    add(
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq -",
        &["e7e5", "c7c5", "e7e6", "d7d5", "g8f6", "d7d6"],
    );
    // After 1.d4 (black moves).
    add(
        "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq -",
        &["d7d5", "g8f6", "e7e6", "g7g6"],
    );
    // After 1.Nf3 (black moves).
    add(
        "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq -",
        &["d7d5", "g8f6", "c7c5"],
    );
    // After 1.c4 (black moves).
    add(
        "rnbqkbnr/pppppppp/8/8/2P5/8/PP1PPPPP/RNBQKBNR b KQkq -",
        &["e7e5", "g8f6", "c7c5"],
    );

    // After 1.e4 e5 (white moves).
    add(
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq -",
        &["g1f3", "f1c4", "b1c3"],
    );
    // 1.e4 e5 2.Nf3: Nc6, Nf6 (Petrov), d6 (Philidor).
    add(
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq -",
        &["b8c6", "g8f6", "d7d6"],
    );
    // 1.e4 e5 2.Nf3 Nc6: Bb5 (Ruy Lopez), Bc4 (Italian), d4 (Scotch).
    add(
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq -",
        &["f1b5", "f1c4", "d2d4"],
    );
    // Italian: Bc5, Nf6 (Two Knights).
    add(
        "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq -",
        &["f8c5", "g8f6"],
    );
    // Ruy Lopez: a6 (Morphy), Nf6 (Berlin), d6.
    add(
        "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq -",
        &["a7a6", "g8f6", "d7d6"],
    );

    // Sicilian after 1.e4 c5 (white moves).
    add(
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq -",
        &["g1f3", "b1c3", "c2c3"],
    );
    // Open Sicilian: d6 (Najdorf/Dragon), Nc6, e6.
    add(
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq -",
        &["d7d6", "b8c6", "e7e6"],
    );
    add(
        "rnbqkbnr/pp2pppp/3p4/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq -",
        &["d2d4"],
    );
    // 2...Nc6: d4, Bb5 (Rossolimo).
    add(
        "r1bqkbnr/pp1ppppp/2n5/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq -",
        &["d2d4", "f1b5"],
    );
    add(
        "rnbqkbnr/pp1p1ppp/4p3/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq -",
        &["d2d4"],
    );

    // French.
    add(
        "rnbqkbnr/pppp1ppp/4p3/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq -",
        &["d2d4", "g1f3"],
    );
    add(
        "rnbqkbnr/pppp1ppp/4p3/8/3PP3/8/PPP2PPP/RNBQKBNR b KQkq -",
        &["d7d5"],
    );

    // Scandinavian.
    add(
        "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq -",
        &["e4d5"],
    );
    // Alekhine.
    add(
        "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq -",
        &["e4e5", "b1c3"],
    );
    // Pirc.
    add(
        "rnbqkbnr/ppp1pppp/3p4/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq -",
        &["d2d4", "g1f3"],
    );

    // Queen's pawn: 1.d4 d5.
    add(
        "rnbqkbnr/ppp1pppp/8/3p4/3P4/8/PPP1PPPP/RNBQKBNR w KQkq -",
        &["c2c4", "g1f3", "c1f4"],
    );
    // Queen's Gambit: e6 (QGD), c6 (Slav), dxc4 (QGA).
    add(
        "rnbqkbnr/ppp1pppp/8/3p4/2PP4/8/PP2PPPP/RNBQKBNR b KQkq -",
        &["e7e6", "c7c6", "d5c4"],
    );
    add(
        "rnbqkbnr/ppp2ppp/4p3/3p4/2PP4/8/PP2PPPP/RNBQKBNR w KQkq -",
        &["b1c3", "g1f3"],
    );
    // Slav.
    add(
        "rnbqkbnr/pp2pppp/2p5/3p4/2PP4/8/PP2PPPP/RNBQKBNR w KQkq -",
        &["g1f3", "b1c3"],
    );

    // Indian defences: 1.d4 Nf6.
    add(
        "rnbqkb1r/pppppppp/5n2/8/3P4/8/PPP1PPPP/RNBQKBNR w KQkq -",
        &["c2c4", "g1f3"],
    );
    // 2.c4: e6 (Nimzo/QID), g6 (KID/Grünfeld), c5 (Benoni).
    add(
        "rnbqkb1r/pppppppp/5n2/8/2PP4/8/PP2PPPP/RNBQKBNR b KQkq -",
        &["e7e6", "g7g6", "c7c5"],
    );
    add(
        "rnbqkb1r/pppp1ppp/4pn2/8/2PP4/8/PP2PPPP/RNBQKBNR w KQkq -",
        &["b1c3", "g1f3", "g2g3"],
    );
    add(
        "rnbqkb1r/pppppp1p/5np1/8/2PP4/8/PP2PPPP/RNBQKBNR w KQkq -",
        &["b1c3"],
    );
    // King's Indian: Bg7.
    add(
        "rnbqkb1r/pppppp1p/5np1/8/2PP4/2N5/PP2PPPP/R1BQKBNR b KQkq -",
        &["f8g7"],
    );

    // 1.d4 e6 and 1.d4 g6 (Modern).
    add(
        "rnbqkbnr/pppp1ppp/4p3/8/3P4/8/PPP1PPPP/RNBQKBNR w KQkq -",
        &["c2c4", "g1f3", "e2e4"],
    );
    add(
        "rnbqkbnr/pppppp1p/6p1/8/3P4/8/PPP1PPPP/RNBQKBNR w KQkq -",
        &["c2c4", "e2e4"],
    );

    // Réti complexes.
    add(
        "rnbqkbnr/ppp1pppp/8/3p4/8/5N2/PPPPPPPP/RNBQKB1R w KQkq -",
        &["d2d4", "g2g3", "c2c4"],
    );
    add(
        "rnbqkb1r/pppppppp/5n2/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq -",
        &["d2d4", "c2c4", "g2g3"],
    );

    // English: 1.c4 e5 (reversed Sicilian), 1.c4 Nf6, 1.c4 c5.
    add(
        "rnbqkbnr/pppp1ppp/8/4p3/2P5/8/PP1PPPPP/RNBQKBNR w KQkq -",
        &["b1c3", "g2g3", "g1f3"],
    );
    add(
        "rnbqkb1r/pppppppp/5n2/8/2P5/8/PP1PPPPP/RNBQKBNR w KQkq -",
        &["b1c3", "g1f3", "d2d4"],
    );
    add(
        "rnbqkbnr/pp1ppppp/8/2p5/2P5/8/PP1PPPPP/RNBQKBNR w KQkq -",
        &["g1f3", "b1c3"],
    );

    book
});

/// An opening book instance: either the standard line set or empty.
pub struct OpeningBook {
    lines: Option<&'static BookMap>,
}

impl OpeningBook {
    /// The built-in line set.
    pub fn standard() -> OpeningBook {
        OpeningBook {
            lines: Some(&STANDARD_LINES),
        }
    }

    /// A book with no entries: every lookup falls through to the search.
    pub fn empty() -> OpeningBook {
        OpeningBook { lines: None }
    }

    /// The first four space-separated FEN fields - the part of the FEN that
    /// identifies an opening position regardless of the clocks.
    fn position_key(fen: &str) -> &str {
        let mut spaces = 0;
        for (i, byte) in fen.bytes().enumerate() {
            if byte == b' ' {
                spaces += 1;
                if spaces == 4 {
                    return &fen[..i];
                }
            }
        }
        fen
    }

    /// Pick a book move for the position, uniformly at random. `None` when
    /// the position is not in the book.
    pub fn pick(&self, fen: &str) -> Option<&'static str> {
        let lines = self.lines?;
        let moves = lines.get(OpeningBook::position_key(fen))?;
        moves.choose(&mut rand::thread_rng()).copied()
    }

    /// Force construction of the standard line set (startup warm-up).
    pub fn init() {
        Lazy::force(&STANDARD_LINES);
    }
}
