//! # Transposition Table
//!
//! ## Overview
//!
//! A process-wide, power-of-two hash table mapping Zobrist keys to search
//! results: `(key, score, depth, best move, bound flag)` in 16 bytes per
//! entry. The table is the only state shared between requests - it persists
//! deliberately, so a later search of a position tree the engine has seen
//! before starts with move-ordering hints and usable bounds.
//!
//! ## Lock-Free Sharing
//!
//! Entries are published with the XOR-key trick rather than a lock: each
//! slot holds two atomic words, `key ^ data` and `data`, written and read
//! with relaxed ordering. A reader reconstructs the key as
//! `word0 ^ word1`; if a concurrent writer tore the pair, the reconstructed
//! key cannot match the probed key and the probe reports a miss. Corrupt
//! entries are thus indistinguishable from absent ones, which is exactly
//! the failure mode the search tolerates.
//!
//! ## Replacement and Mate Scores
//!
//! Replacement is depth-preferred: a slot is overwritten when it is empty,
//! holds a different position, or the incoming entry searched at least as
//! deep as the stored one. Mate scores are distance-from-root dependent, so
//! they are stored in root-independent form (shifted by `ply`) and shifted
//! back on probe; anything beyond ±90000 centipawns is a mate score.

use crate::moves::Move;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

/// Scores with |score| above this are mate scores and get ply-adjusted in
/// the table.
pub const MATE_THRESHOLD: i32 = 90_000;

/// Number of entries (2^20 × 16 bytes = 16 MB).
pub const TT_SIZE: usize = 1 << 20;

/// Bound kind of a stored score.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Score is exact (searched with an open window).
    Exact = 0,
    /// Score is a lower bound (the search failed high).
    Lower = 1,
    /// Score is an upper bound (the search failed low).
    Upper = 2,
}

impl Bound {
    fn from_bits(bits: u64) -> Bound {
        match bits & 0b11 {
            0 => Bound::Exact,
            1 => Bound::Lower,
            _ => Bound::Upper,
        }
    }
}

/// Result of a probe: the stored best move (for ordering) whenever the key
/// matched, and a usable score when depth and bound allow a cutoff.
#[derive(Copy, Clone, Debug)]
pub struct TtLookup {
    pub best: Move,
    pub score: Option<i32>,
}

impl TtLookup {
    const MISS: TtLookup = TtLookup {
        best: Move::NULL,
        score: None,
    };
}

struct Slot {
    key_xor_data: AtomicU64,
    data: AtomicU64,
}

pub struct TranspositionTable {
    slots: Vec<Slot>,
}

// data word layout:
//   bits  0..32  score (i32 as u32)
//   bits 32..40  depth (u8)
//   bits 40..42  bound
//   bits 48..64  best move (raw u16)
fn pack(score: i32, depth: i32, bound: Bound, best: Move) -> u64 {
    (score as u32 as u64)
        | ((depth as u8 as u64) << 32)
        | ((bound as u64) << 40)
        | ((best.raw() as u64) << 48)
}

fn unpack_score(data: u64) -> i32 {
    (data & 0xFFFF_FFFF) as u32 as i32
}

fn unpack_depth(data: u64) -> i32 {
    ((data >> 32) & 0xFF) as i32
}

fn unpack_best(data: u64) -> Move {
    Move::from_raw((data >> 48) as u16)
}

impl TranspositionTable {
    /// Create a table with `size` slots (must be a power of two).
    pub fn new(size: usize) -> TranspositionTable {
        debug_assert!(size.is_power_of_two(), "table size must be a power of two");
        let mut slots = Vec::with_capacity(size);
        for _ in 0..size {
            slots.push(Slot {
                key_xor_data: AtomicU64::new(0),
                data: AtomicU64::new(0),
            });
        }
        TranspositionTable { slots }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & (self.slots.len() - 1)
    }

    /// Store an entry with depth-preferred replacement. `score` is the
    /// root-relative score; mate scores are shifted to root-independent
    /// form using `ply`.
    pub fn store(&self, key: u64, score: i32, depth: i32, best: Move, bound: Bound, ply: usize) {
        let mut stored = score;
        if stored > MATE_THRESHOLD {
            stored += ply as i32;
        } else if stored < -MATE_THRESHOLD {
            stored -= ply as i32;
        }

        let slot = &self.slots[self.index(key)];
        let cur_xor = slot.key_xor_data.load(Ordering::Relaxed);
        let cur_data = slot.data.load(Ordering::Relaxed);
        let cur_key = cur_xor ^ cur_data;

        let empty = cur_xor == 0 && cur_data == 0;
        if empty || cur_key != key || depth >= unpack_depth(cur_data) {
            let data = pack(stored, depth, bound, best);
            slot.data.store(data, Ordering::Relaxed);
            slot.key_xor_data.store(key ^ data, Ordering::Relaxed);
        }
    }

    /// Probe for `key`. The stored move comes back whenever the key matches
    /// (any depth - it is an ordering hint); the score comes back only when
    /// the stored depth reaches `depth` and the bound applies against the
    /// `[alpha, beta]` window. Mate scores are shifted back by `ply`.
    pub fn probe(&self, key: u64, depth: i32, alpha: i32, beta: i32, ply: usize) -> TtLookup {
        let slot = &self.slots[self.index(key)];
        let xor = slot.key_xor_data.load(Ordering::Relaxed);
        let data = slot.data.load(Ordering::Relaxed);
        if xor == 0 && data == 0 {
            return TtLookup::MISS;
        }
        if xor ^ data != key {
            // Different position or torn write: either way, a miss.
            return TtLookup::MISS;
        }

        let best = unpack_best(data);
        if unpack_depth(data) < depth {
            return TtLookup { best, score: None };
        }

        let mut score = unpack_score(data);
        if score > MATE_THRESHOLD {
            score -= ply as i32;
        } else if score < -MATE_THRESHOLD {
            score += ply as i32;
        }

        let usable = match Bound::from_bits(data >> 40) {
            Bound::Exact => true,
            Bound::Lower => score >= beta,
            Bound::Upper => score <= alpha,
        };

        TtLookup {
            best,
            score: usable.then_some(score),
        }
    }

    /// Wipe every entry. Not used on the request path (persistence is the
    /// point); tests use it to get reproducible node counts.
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.data.store(0, Ordering::Relaxed);
            slot.key_xor_data.store(0, Ordering::Relaxed);
        }
    }
}

/// The process-wide table shared by every request.
pub static TT: Lazy<TranspositionTable> = Lazy::new(|| TranspositionTable::new(TT_SIZE));

/// Allocate the shared table (startup warm-up).
pub fn init() {
    Lazy::force(&TT);
}
