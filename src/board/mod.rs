//! Board representation for Connect6
//!
//! - [`Board`]: literal cell contents (source of truth)
//! - [`RoadTable`]: the line index, a cache of every 6-cell window's composition
//! - [`Position`]: board + index + move history, the state every search mutates

pub mod board;
pub mod position;
pub mod road;

#[cfg(test)]
mod tests;

use std::fmt;

// Re-exports
pub use board::Board;
pub use position::Position;
pub use road::{Road, RoadId, RoadTable};

/// Board size (19x19)
pub const BOARD_SIZE: usize = 19;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 361

/// Stones in a row needed to win
pub const ROAD_LEN: usize = 6;

/// The pre-placed black stone sits here before the first move.
pub const CENTER: Pos = Pos { row: 9, col: 9 };

/// Stone colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Whether this cell lies on the board. `Pos` fields are public, so a
    /// caller can build one that does not.
    #[inline]
    pub fn on_board(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Closeness to the center: 18 at the center, 0 in the corners.
    #[inline]
    pub fn center_bonus(self) -> i32 {
        let center = CENTER.row as i32;
        18 - (self.row as i32 - center).abs() - (self.col as i32 - center).abs()
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

/// Column letter followed by 1-based row, e.g. `J10` for the center.
impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.col) as char, self.row as u32 + 1)
    }
}

/// One Connect6 turn: two stones of the mover's color.
///
/// The pair is unordered; the constructor stores the lower index first so
/// `Move::new(a, b) == Move::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    first: Pos,
    second: Pos,
}

impl Move {
    #[inline]
    pub fn new(a: Pos, b: Pos) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    #[inline]
    pub fn first(self) -> Pos {
        self.first
    }

    #[inline]
    pub fn second(self) -> Pos {
        self.second
    }

    #[inline]
    pub fn cells(self) -> [Pos; 2] {
        [self.first, self.second]
    }

    #[inline]
    pub fn contains(self, pos: Pos) -> bool {
        self.first == pos || self.second == pos
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}
