//! Per-game mutable search state
//!
//! One [`SearchContext`] is owned by each engine instance and threaded by
//! `&mut` through every search. It keeps the position hash in step with the
//! [`Position`] it is used with: route every make/undo through
//! [`SearchContext::make_move`] / [`SearchContext::undo_move`].

use crate::board::{Move, Position};

use super::{TTStats, TranspositionTable, ZobristTable};

/// Plies for which killer moves are tracked.
pub const MAX_PLY: usize = 64;

pub struct SearchContext {
    zobrist: ZobristTable,
    tt: TranspositionTable,
    hash: u64,
    /// Two most recent cutoff moves per ply
    killers: [[Option<Move>; 2]; MAX_PLY],
}

impl SearchContext {
    /// Context with a `tt_size_mb` table, hashed for `pos`.
    #[must_use]
    pub fn new(tt_size_mb: usize, pos: &Position) -> Self {
        let zobrist = ZobristTable::new();
        let hash = zobrist.hash(pos.board(), pos.side_to_move());
        Self {
            zobrist,
            tt: TranspositionTable::new(tt_size_mb),
            hash,
            killers: [[None; 2]; MAX_PLY],
        }
    }

    /// New game: forget everything learned and rehash `pos`.
    pub fn reset(&mut self, pos: &Position) {
        self.tt.clear();
        self.killers = [[None; 2]; MAX_PLY];
        self.resync(pos);
    }

    /// Recompute the hash from scratch, e.g. after setup stones were placed.
    pub fn resync(&mut self, pos: &Position) {
        self.hash = self.zobrist.hash(pos.board(), pos.side_to_move());
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    #[inline]
    pub fn tt_mut(&mut self) -> &mut TranspositionTable {
        &mut self.tt
    }

    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }

    /// Play `mv` on `pos` and update the hash.
    #[inline]
    pub fn make_move(&mut self, pos: &mut Position, mv: Move) {
        let color = pos.side_to_move();
        pos.make_move(mv);
        self.hash = self.zobrist.update_move(self.hash, mv, color);
    }

    /// Take back the last move of `pos` and update the hash.
    #[inline]
    pub fn undo_move(&mut self, pos: &mut Position) -> Option<Move> {
        let mv = pos.undo_move()?;
        self.hash = self.zobrist.update_move(self.hash, mv, pos.side_to_move());
        Some(mv)
    }

    #[inline]
    pub fn killers(&self, ply: usize) -> [Option<Move>; 2] {
        self.killers.get(ply).copied().unwrap_or([None; 2])
    }

    /// Remember a move that caused a beta cutoff at `ply`.
    pub fn record_killer(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.killers.get_mut(ply) else {
            return;
        };
        if slot[0] != Some(mv) {
            slot[1] = slot[0];
            slot[0] = Some(mv);
        }
    }

    pub fn clear_killers(&mut self) {
        self.killers = [[None; 2]; MAX_PLY];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    #[test]
    fn test_hash_follows_make_undo() {
        let mut pos = Position::new();
        let mut ctx = SearchContext::new(1, &pos);
        let start = ctx.hash();

        let a = Move::new(Pos::new(9, 10), Pos::new(9, 11));
        let b = Move::new(Pos::new(10, 10), Pos::new(10, 11));
        ctx.make_move(&mut pos, a);
        ctx.make_move(&mut pos, b);
        let expected = ZobristTable::new().hash(pos.board(), pos.side_to_move());
        assert_eq!(ctx.hash(), expected);

        assert_eq!(ctx.undo_move(&mut pos), Some(b));
        assert_eq!(ctx.undo_move(&mut pos), Some(a));
        assert_eq!(ctx.undo_move(&mut pos), None);
        assert_eq!(ctx.hash(), start);
    }

    #[test]
    fn test_killers() {
        let pos = Position::new();
        let mut ctx = SearchContext::new(1, &pos);
        let a = Move::new(Pos::new(1, 1), Pos::new(1, 2));
        let b = Move::new(Pos::new(2, 1), Pos::new(2, 2));

        ctx.record_killer(3, a);
        ctx.record_killer(3, a);
        assert_eq!(ctx.killers(3), [Some(a), None]);
        ctx.record_killer(3, b);
        assert_eq!(ctx.killers(3), [Some(b), Some(a)]);

        // Out-of-range plies are ignored
        ctx.record_killer(MAX_PLY + 5, a);
        assert_eq!(ctx.killers(MAX_PLY + 5), [None, None]);

        ctx.clear_killers();
        assert_eq!(ctx.killers(3), [None, None]);
    }

    #[test]
    fn test_reset_clears_table() {
        let mut pos = Position::new();
        let mut ctx = SearchContext::new(1, &pos);
        let hash = ctx.hash();
        ctx.tt_mut().store(hash, 3, 10, crate::search::EntryType::Exact, None);
        assert_eq!(ctx.tt_stats().used, 1);

        ctx.make_move(&mut pos, Move::new(Pos::new(0, 0), Pos::new(0, 1)));
        pos.reset();
        ctx.reset(&pos);
        assert_eq!(ctx.tt_stats().used, 0);
        assert_eq!(ctx.hash(), ZobristTable::new().hash(pos.board(), pos.side_to_move()));
    }
}
