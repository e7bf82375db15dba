//! Board structure holding the literal cell contents

use std::fmt;

use super::{Pos, Stone, BOARD_SIZE, CENTER, TOTAL_CELLS};

/// Literal stone placement. Everything else (line index, proximity, hash)
/// is derived from this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Stone; TOTAL_CELLS],
}

impl Board {
    /// Initial board: a single black stone on the center.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.set(CENTER, Stone::Black);
        board
    }

    /// Board without the center stone.
    pub fn empty() -> Self {
        Self {
            cells: [Stone::Empty; TOTAL_CELLS],
        }
    }

    /// Get stone at position. Off-board cells read as empty.
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if !pos.on_board() {
            return Stone::Empty;
        }
        self.cells[pos.to_index()]
    }

    /// Check if an on-board position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        pos.on_board() && self.cells[pos.to_index()] == Stone::Empty
    }

    /// Overwrite one cell. Off-board writes are ignored.
    #[inline]
    pub fn set(&mut self, pos: Pos, stone: Stone) {
        if pos.on_board() {
            self.cells[pos.to_index()] = stone;
        }
    }

    /// Iterate over empty cells in index order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Stone::Empty)
            .map(|(i, _)| Pos::from_index(i))
    }

    /// Iterate over occupied cells with their color.
    pub fn stones(&self) -> impl Iterator<Item = (Pos, Stone)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, s)| **s != Stone::Empty)
            .map(|(i, s)| (Pos::from_index(i), *s))
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|s| **s != Stone::Empty).count()
    }

    #[inline]
    pub fn count(&self, stone: Stone) -> usize {
        self.cells.iter().filter(|s| **s == stone).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Text diagram: `x` black, `o` white, `-` empty, row 19 on top.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE as u8 {
            write!(f, "{}", (b'A' + col) as char)?;
        }
        writeln!(f)?;
        for row in (0..BOARD_SIZE as u8).rev() {
            write!(f, "{:02} ", row + 1)?;
            for col in 0..BOARD_SIZE as u8 {
                let c = match self.get(Pos::new(row, col)) {
                    Stone::Black => 'x',
                    Stone::White => 'o',
                    Stone::Empty => '-',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
