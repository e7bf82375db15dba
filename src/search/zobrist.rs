//! Zobrist hashing for position identification
//!
//! A Connect6 turn places two stones and passes the turn once, so the
//! incremental update works on whole moves: both stone keys plus the
//! side-to-move key. Applying the same update again undoes it.
//!
//! # Example
//!
//! ```
//! use connect6::board::{Move, Pos, Position, Stone};
//! use connect6::search::ZobristTable;
//!
//! let zt = ZobristTable::new();
//! let mut pos = Position::new();
//! let hash1 = zt.hash(pos.board(), pos.side_to_move());
//!
//! let mv = Move::new(Pos::new(9, 10), Pos::new(10, 10));
//! pos.make_move(mv);
//!
//! // Incremental update is equivalent to full recomputation
//! let hash2 = zt.update_move(hash1, mv, Stone::White);
//! assert_eq!(hash2, zt.hash(pos.board(), pos.side_to_move()));
//! ```

use crate::board::{Board, Move, Pos, Stone, TOTAL_CELLS};

/// Zobrist hash table for position hashing.
///
/// Uses XOR-based hashing with precomputed random values for each
/// (cell, stone color) combination.
#[derive(Debug, Clone)]
pub struct ZobristTable {
    /// Random values for black stones at each cell
    black: [u64; TOTAL_CELLS],
    /// Random values for white stones at each cell
    white: [u64; TOTAL_CELLS],
    /// Random value XORed when black is to move
    black_to_move: u64,
}

impl ZobristTable {
    /// Create a new Zobrist table with deterministic random values.
    ///
    /// Uses a linear congruential generator (LCG) with a fixed seed
    /// so hashes are reproducible across runs.
    #[must_use]
    pub fn new() -> Self {
        // Constants from Knuth's MMIX LCG
        let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
        let mut next_rand = || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            seed
        };

        let mut black = [0u64; TOTAL_CELLS];
        let mut white = [0u64; TOTAL_CELLS];
        for i in 0..TOTAL_CELLS {
            black[i] = next_rand();
            white[i] = next_rand();
        }

        Self {
            black,
            white,
            black_to_move: next_rand(),
        }
    }

    #[inline]
    fn stone_key(&self, pos: Pos, stone: Stone) -> u64 {
        let idx = pos.to_index();
        match stone {
            Stone::Black => self.black[idx],
            Stone::White => self.white[idx],
            Stone::Empty => 0,
        }
    }

    /// Compute the full hash for a board.
    ///
    /// Iterates over every stone. During search use [`update_move`](Self::update_move).
    #[must_use]
    pub fn hash(&self, board: &Board, side_to_move: Stone) -> u64 {
        let mut h = 0u64;
        for (pos, stone) in board.stones() {
            h ^= self.stone_key(pos, stone);
        }
        if side_to_move == Stone::Black {
            h ^= self.black_to_move;
        }
        h
    }

    /// Incrementally update the hash for `mv` played (or taken back) by `color`.
    ///
    /// XOR is its own inverse, so the same call serves make and undo.
    #[inline]
    #[must_use]
    pub fn update_move(&self, hash: u64, mv: Move, color: Stone) -> u64 {
        hash ^ self.stone_key(mv.first(), color)
            ^ self.stone_key(mv.second(), color)
            ^ self.black_to_move
    }

    /// Toggle the side-to-move component of the hash.
    #[inline]
    #[must_use]
    pub fn toggle_side(&self, hash: u64) -> u64 {
        hash ^ self.black_to_move
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}
