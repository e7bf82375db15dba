//! Transposition Table for caching search results
//!
//! The transposition table stores search results indexed by position hash,
//! so positions reached by different move orders are searched once.
//!
//! # Example
//!
//! ```
//! use connect6::board::{Move, Pos};
//! use connect6::search::{EntryType, TranspositionTable};
//!
//! let mut tt = TranspositionTable::new(1); // 1 MB
//! let mv = Move::new(Pos::new(9, 10), Pos::new(10, 10));
//!
//! // Store a search result
//! let hash = 0x1234_5678_9ABC_DEF0;
//! tt.store(hash, 5, 100, EntryType::Exact, Some(mv));
//!
//! // Probe for the result
//! let hit = tt.probe(hash, 5, -1000, 1000).unwrap();
//! assert_eq!(hit.score, Some(100));
//! assert_eq!(hit.best_move, Some(mv));
//! ```

use crate::board::Move;

/// Entry type for score interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Exact score - the search completed inside the window
    Exact,
    /// Lower bound - score >= stored value (beta cutoff)
    LowerBound,
    /// Upper bound - score <= stored value (alpha fail-low)
    UpperBound,
}

/// Transposition table entry
#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    /// Zobrist hash of the position
    pub hash: u64,
    /// Remaining depth the entry was searched to
    pub depth: i8,
    /// Evaluation score
    pub score: i32,
    /// Type of score (exact, lower bound, upper bound)
    pub entry_type: EntryType,
    /// Best move found for this position
    pub best_move: Option<Move>,
}

/// Result of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// Score usable at the probing node, if the entry was deep enough and
    /// its bound is compatible with the window
    pub score: Option<i32>,
    /// Stored best move, for move ordering
    pub best_move: Option<Move>,
}

/// Transposition table for caching search results.
///
/// Direct-mapped: each hash maps to exactly one slot. Collisions are
/// resolved by a depth-preferred replacement policy.
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    size: usize,
}

impl TranspositionTable {
    /// Create a new transposition table with the given size in megabytes.
    ///
    /// # Arguments
    ///
    /// * `size_mb` - Size of the table in megabytes
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let size = (size_mb * 1024 * 1024) / entry_size;

        // Ensure at least some entries
        let size = size.max(1024);

        Self {
            entries: vec![None; size],
            size,
        }
    }

    #[inline]
    fn slot(&self, hash: u64) -> usize {
        (hash % self.size as u64) as usize
    }

    /// Probe the table for a position.
    ///
    /// # Arguments
    ///
    /// * `hash` - Zobrist hash of the position
    /// * `depth` - Remaining depth at the probing node (entry must be at least this deep)
    /// * `alpha` - Current alpha bound
    /// * `beta` - Current beta bound
    ///
    /// # Returns
    ///
    /// * `Some(Probe)` - Entry for this hash; `score` is set only when usable
    /// * `None` - No entry found for this hash
    #[must_use]
    pub fn probe(&self, hash: u64, depth: i8, alpha: i32, beta: i32) -> Option<Probe> {
        let entry = self.entries[self.slot(hash)]?;
        if entry.hash != hash {
            return None;
        }

        let usable = entry.depth >= depth
            && match entry.entry_type {
                EntryType::Exact => true,
                EntryType::LowerBound => entry.score >= beta,
                EntryType::UpperBound => entry.score <= alpha,
            };

        Some(Probe {
            score: usable.then_some(entry.score),
            best_move: entry.best_move,
        })
    }

    /// Best move stored for this position, if any.
    #[must_use]
    pub fn get_best_move(&self, hash: u64) -> Option<Move> {
        self.entries[self.slot(hash)]
            .filter(|e| e.hash == hash)
            .and_then(|e| e.best_move)
    }

    /// Store a position in the table.
    ///
    /// Uses a depth-preferred replacement policy: an entry is replaced if
    /// the slot is empty, contains the same position, or the new search
    /// is at least as deep as the existing entry. A re-store of the same
    /// position without a move keeps the previously stored move.
    pub fn store(
        &mut self,
        hash: u64,
        depth: i8,
        score: i32,
        entry_type: EntryType,
        best_move: Option<Move>,
    ) {
        let idx = self.slot(hash);

        let (should_replace, previous_move) = match &self.entries[idx] {
            None => (true, None),
            Some(e) if e.hash == hash => (true, e.best_move),
            Some(e) => (e.depth <= depth, None),
        };

        if should_replace {
            self.entries[idx] = Some(TTEntry {
                hash,
                depth,
                score,
                entry_type,
                best_move: best_move.or(previous_move),
            });
        }
    }

    /// Clear all entries in the table.
    ///
    /// Called when a new game starts.
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    /// Get statistics about table usage.
    #[must_use]
    pub fn stats(&self) -> TTStats {
        let used = self.entries.iter().filter(|e| e.is_some()).count();
        TTStats {
            size: self.size,
            used,
            usage_percent: (used as f64 / self.size as f64 * 100.0) as u8,
        }
    }
}

/// Statistics about transposition table usage.
#[derive(Debug, Clone, Copy)]
pub struct TTStats {
    /// Total number of slots in the table
    pub size: usize,
    /// Number of slots currently occupied
    pub used: usize,
    /// Percentage of table in use (0-100)
    pub usage_percent: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    fn mv(r: u8, c: u8) -> Move {
        Move::new(Pos::new(r, c), Pos::new(r, c + 1))
    }

    #[test]
    fn test_tt_store_probe_exact() {
        let mut tt = TranspositionTable::new(1);
        tt.store(12345, 5, 100, EntryType::Exact, Some(mv(9, 9)));

        let hit = tt.probe(12345, 5, -1000, 1000).unwrap();
        assert_eq!(hit.score, Some(100));
        assert_eq!(hit.best_move, Some(mv(9, 9)));
    }

    #[test]
    fn test_tt_depth_requirement() {
        let mut tt = TranspositionTable::new(1);
        tt.store(12345, 3, 100, EntryType::Exact, Some(mv(9, 9)));

        // Deeper request: score unusable, move still returned for ordering
        let hit = tt.probe(12345, 5, -1000, 1000).unwrap();
        assert_eq!(hit.score, None);
        assert_eq!(hit.best_move, Some(mv(9, 9)));

        assert_eq!(tt.probe(12345, 2, -1000, 1000).unwrap().score, Some(100));
    }

    #[test]
    fn test_tt_zero_score_is_usable() {
        let mut tt = TranspositionTable::new(1);
        tt.store(7, 4, 0, EntryType::Exact, None);
        assert_eq!(tt.probe(7, 4, -10, 10).unwrap().score, Some(0));
    }

    #[test]
    fn test_tt_lower_bound_cutoff() {
        let mut tt = TranspositionTable::new(1);
        tt.store(12345, 5, 500, EntryType::LowerBound, None);

        assert_eq!(tt.probe(12345, 5, -1000, 400).unwrap().score, Some(500));
        assert_eq!(tt.probe(12345, 5, -1000, 600).unwrap().score, None);
    }

    #[test]
    fn test_tt_upper_bound_cutoff() {
        let mut tt = TranspositionTable::new(1);
        tt.store(12345, 5, -500, EntryType::UpperBound, None);

        assert_eq!(tt.probe(12345, 5, -400, 1000).unwrap().score, Some(-500));
        assert_eq!(tt.probe(12345, 5, -600, 1000).unwrap().score, None);
    }

    #[test]
    fn test_tt_hash_mismatch() {
        let mut tt = TranspositionTable::new(1);
        let size = tt.size as u64;
        tt.store(5, 5, 100, EntryType::Exact, Some(mv(1, 1)));
        // Same slot, different hash
        assert!(tt.probe(5 + size, 5, -1000, 1000).is_none());
        assert_eq!(tt.get_best_move(5 + size), None);
        assert_eq!(tt.get_best_move(5), Some(mv(1, 1)));
    }

    #[test]
    fn test_tt_replacement_policy() {
        let mut tt = TranspositionTable::new(1);
        let size = tt.size as u64;

        tt.store(3, 6, 10, EntryType::Exact, Some(mv(2, 2)));
        // Shallower search on a colliding position does not evict
        tt.store(3 + size, 4, 20, EntryType::Exact, Some(mv(4, 4)));
        assert_eq!(tt.get_best_move(3), Some(mv(2, 2)));

        // Same depth does
        tt.store(3 + size, 6, 20, EntryType::Exact, Some(mv(4, 4)));
        assert_eq!(tt.get_best_move(3 + size), Some(mv(4, 4)));
        assert!(tt.probe(3, 1, -100, 100).is_none());
    }

    #[test]
    fn test_tt_same_position_keeps_move() {
        let mut tt = TranspositionTable::new(1);
        tt.store(99, 6, 10, EntryType::Exact, Some(mv(2, 2)));
        tt.store(99, 2, -5, EntryType::UpperBound, None);

        let hit = tt.probe(99, 2, -5, 100).unwrap();
        assert_eq!(hit.score, Some(-5));
        assert_eq!(hit.best_move, Some(mv(2, 2)));
    }

    #[test]
    fn test_tt_clear_and_stats() {
        let mut tt = TranspositionTable::new(1);
        assert_eq!(tt.stats().used, 0);

        tt.store(1, 1, 1, EntryType::Exact, None);
        tt.store(2, 1, 1, EntryType::Exact, None);
        assert_eq!(tt.stats().used, 2);

        tt.clear();
        assert_eq!(tt.stats().used, 0);
        assert!(tt.probe(1, 1, -10, 10).is_none());
    }

    #[test]
    fn test_tt_minimum_size() {
        let tt = TranspositionTable::new(0);
        assert_eq!(tt.stats().size, 1024);
    }
}
