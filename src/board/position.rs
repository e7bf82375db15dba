//! Game position: board, line index and move history kept in lockstep
//!
//! Every search in the crate mutates a single `Position` in place with
//! [`make_move`](Position::make_move) / [`undo_move`](Position::undo_move)
//! instead of cloning it per branch.

use super::{Board, Move, Pos, RoadTable, Stone, BOARD_SIZE, CENTER, TOTAL_CELLS};

/// Radius of the neighbourhood counted by the proximity map.
const PROXIMITY_RADIUS: i32 = 2;

#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    roads: RoadTable,
    /// Stones within a 5x5 box around each cell
    proximity: [u8; TOTAL_CELLS],
    history: Vec<Move>,
    side_to_move: Stone,
}

impl Position {
    /// Initial position: black center stone, white to move.
    pub fn new() -> Self {
        let board = Board::new();
        Self::from_board(board, Stone::White)
    }

    /// Build a position from literal board contents, rebuilding the index.
    /// The history starts empty.
    pub fn from_board(board: Board, side_to_move: Stone) -> Self {
        let roads = RoadTable::from_board(&board);
        let mut proximity = [0u8; TOTAL_CELLS];
        for (pos, _) in board.stones() {
            bump_proximity(&mut proximity, pos, true);
        }
        Self {
            board,
            roads,
            proximity,
            history: Vec::with_capacity(TOTAL_CELLS / 2),
            side_to_move,
        }
    }

    /// Back to the initial position.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.roads.reset();
        self.proximity = [0; TOTAL_CELLS];
        for (pos, _) in self.board.stones() {
            bump_proximity(&mut self.proximity, pos, true);
        }
        self.history.clear();
        self.side_to_move = Stone::White;
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn roads(&self) -> &RoadTable {
        &self.roads
    }

    #[inline]
    pub fn side_to_move(&self) -> Stone {
        self.side_to_move
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        self.board.get(pos)
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.board.is_empty(pos)
    }

    /// Stones within two cells (Chebyshev) of `pos`.
    #[inline]
    pub fn proximity(&self, pos: Pos) -> u8 {
        if !pos.on_board() {
            return 0;
        }
        self.proximity[pos.to_index()]
    }

    /// Empty cells worth considering for a stone: those with a stone nearby.
    /// Falls back to the center, then to the first empty cell, so the list
    /// is empty only on a full board.
    pub fn candidate_cells(&self) -> Vec<Pos> {
        let cells: Vec<Pos> = self
            .board
            .empty_cells()
            .filter(|&pos| self.proximity[pos.to_index()] > 0)
            .collect();
        if !cells.is_empty() {
            return cells;
        }
        if self.is_empty(CENTER) {
            return vec![CENTER];
        }
        self.board.empty_cells().take(1).collect()
    }

    /// Both cells on the board, distinct and empty.
    pub fn is_legal(&self, mv: Move) -> bool {
        mv.first() != mv.second() && self.is_empty(mv.first()) && self.is_empty(mv.second())
    }

    /// Place a stone outside the move history. Setup only: the stone cannot
    /// be taken back with `undo_move`. Occupied or off-board cells are ignored.
    pub fn put_stone(&mut self, pos: Pos, stone: Stone) {
        if stone == Stone::Empty || !self.is_empty(pos) {
            return;
        }
        self.board.set(pos, stone);
        self.roads.apply_stone(pos, stone);
        bump_proximity(&mut self.proximity, pos, true);
    }

    /// Play `mv` for the side to move and pass the turn.
    pub fn make_move(&mut self, mv: Move) {
        debug_assert!(self.is_legal(mv), "illegal move {mv}");
        let color = self.side_to_move;
        for pos in mv.cells() {
            self.board.set(pos, color);
            self.roads.apply_stone(pos, color);
            bump_proximity(&mut self.proximity, pos, true);
        }
        self.history.push(mv);
        self.side_to_move = color.opponent();
    }

    /// Take back the last move. Returns `None` when the history is empty.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;
        let color = self.side_to_move.opponent();
        for pos in mv.cells() {
            self.roads.revert_stone(pos, color);
            self.board.set(pos, Stone::Empty);
            bump_proximity(&mut self.proximity, pos, false);
        }
        self.side_to_move = color;
        Some(mv)
    }

    /// Winner of the game, which can only be the player who made the last
    /// move and only if one of its stones completed a six.
    pub fn winner(&self) -> Option<Stone> {
        let mv = self.last_move()?;
        let mover = self.side_to_move.opponent();
        mv.cells()
            .iter()
            .any(|&pos| self.roads.completes_six(pos, mover))
            .then_some(mover)
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Fewer than two empty cells: no move can be made.
    pub fn is_full(&self) -> bool {
        self.board.empty_cells().nth(1).is_none()
    }

    /// Run `f` against the index with extra `color` stones counted on `cells`,
    /// then revert them. The board itself is not touched, so `f` only sees
    /// the index.
    pub fn with_trial_stones<R>(
        &mut self,
        cells: &[Pos],
        color: Stone,
        f: impl FnOnce(&RoadTable) -> R,
    ) -> R {
        for &pos in cells {
            self.roads.apply_stone(pos, color);
        }
        let result = f(&self.roads);
        for &pos in cells.iter().rev() {
            self.roads.revert_stone(pos, color);
        }
        result
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

fn bump_proximity(proximity: &mut [u8; TOTAL_CELLS], pos: Pos, add: bool) {
    let (r, c) = (pos.row as i32, pos.col as i32);
    for dr in -PROXIMITY_RADIUS..=PROXIMITY_RADIUS {
        for dc in -PROXIMITY_RADIUS..=PROXIMITY_RADIUS {
            let (nr, nc) = (r + dr, c + dc);
            if !Pos::is_valid(nr, nc) {
                continue;
            }
            let idx = nr as usize * BOARD_SIZE + nc as usize;
            if add {
                proximity[idx] += 1;
            } else {
                proximity[idx] -= 1;
            }
        }
    }
}
