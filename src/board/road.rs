//! Line index over every 6-cell window ("road") of the board
//!
//! A road is a straight run of exactly [`ROAD_LEN`] cells along one of four
//! axes. Only roads lying fully on the board exist; there are 924 of them.
//! Each road tracks how many black and white stones it holds, and the table
//! keeps the roads bucketed by `(black, white)` so threat queries such as
//! "every road where white has four stones and black none" are a slice read.
//!
//! The table is a cache of the board. `apply_stone` and `revert_stone` are
//! exact inverses and touch only the roads through the given cell, each in
//! O(1) via a per-road slot index inside its bucket.

use super::{Board, Pos, Stone, CENTER, ROAD_LEN, TOTAL_CELLS};

/// Road directions as (row, col) steps: down, right, down-right, up-right.
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// Index of a road inside its [`RoadTable`].
pub type RoadId = u16;

/// Number of distinct counts a road can hold (0..=6).
const COUNTS: usize = ROAD_LEN + 1;

/// One 6-cell window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Road {
    cells: [Pos; ROAD_LEN],
    black: u8,
    white: u8,
}

impl Road {
    /// Build the road starting at `start` along direction `dir`,
    /// or `None` if it would leave the board.
    fn at(start: Pos, dir: usize) -> Option<Self> {
        let (dr, dc) = DIRECTIONS[dir];
        let end_r = start.row as i32 + dr * (ROAD_LEN as i32 - 1);
        let end_c = start.col as i32 + dc * (ROAD_LEN as i32 - 1);
        if !Pos::is_valid(end_r, end_c) {
            return None;
        }
        let mut cells = [start; ROAD_LEN];
        for (i, cell) in cells.iter_mut().enumerate() {
            let r = start.row as i32 + dr * i as i32;
            let c = start.col as i32 + dc * i as i32;
            *cell = Pos::new(r as u8, c as u8);
        }
        Some(Self {
            cells,
            black: 0,
            white: 0,
        })
    }

    #[inline]
    pub fn cells(&self) -> &[Pos; ROAD_LEN] {
        &self.cells
    }

    #[inline]
    pub fn black(&self) -> u8 {
        self.black
    }

    #[inline]
    pub fn white(&self) -> u8 {
        self.white
    }

    /// Stones of `color` on this road.
    #[inline]
    pub fn count(&self, color: Stone) -> u8 {
        match color {
            Stone::Black => self.black,
            Stone::White => self.white,
            Stone::Empty => ROAD_LEN as u8 - self.black - self.white,
        }
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }
}

/// All roads, bucketed by composition, with a per-cell reverse map.
#[derive(Debug, Clone)]
pub struct RoadTable {
    roads: Vec<Road>,
    /// `buckets[black * 7 + white]` holds the ids of roads with that composition
    buckets: Vec<Vec<RoadId>>,
    /// Position of each road inside its current bucket
    slots: Vec<u16>,
    /// Roads passing through each cell (3 in a corner, 24 in the interior)
    by_cell: Vec<Vec<RoadId>>,
}

impl RoadTable {
    /// Index for the initial board: every road empty except those through
    /// the pre-placed center stone.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.apply_stone(CENTER, Stone::Black);
        table
    }

    /// Index with no stones at all.
    pub fn empty() -> Self {
        let mut roads = Vec::with_capacity(924);
        let mut by_cell = vec![Vec::with_capacity(24); TOTAL_CELLS];

        for idx in 0..TOTAL_CELLS {
            let start = Pos::from_index(idx);
            for dir in 0..DIRECTIONS.len() {
                let Some(road) = Road::at(start, dir) else {
                    continue;
                };
                let id = roads.len() as RoadId;
                for cell in road.cells() {
                    by_cell[cell.to_index()].push(id);
                }
                roads.push(road);
            }
        }

        let mut buckets = vec![Vec::new(); COUNTS * COUNTS];
        buckets[0] = (0..roads.len() as RoadId).collect();
        let slots = (0..roads.len() as u16).collect();

        Self {
            roads,
            buckets,
            slots,
            by_cell,
        }
    }

    /// Rebuild from literal board contents. The board is expected to already
    /// contain the center stone if it belongs there.
    pub fn from_board(board: &Board) -> Self {
        let mut table = Self::empty();
        for (pos, stone) in board.stones() {
            table.apply_stone(pos, stone);
        }
        table
    }

    /// Reset to the initial-board index (center stone only).
    pub fn reset(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        for (id, road) in self.roads.iter_mut().enumerate() {
            road.black = 0;
            road.white = 0;
            self.slots[id] = id as u16;
        }
        self.buckets[0] = (0..self.roads.len() as RoadId).collect();
        self.apply_stone(CENTER, Stone::Black);
    }

    /// Count one more `color` stone on every road through `pos`.
    /// Off-board cells and `Stone::Empty` are a no-op.
    pub fn apply_stone(&mut self, pos: Pos, color: Stone) {
        if !pos.on_board() || color == Stone::Empty {
            return;
        }
        for i in 0..self.by_cell[pos.to_index()].len() {
            let id = self.by_cell[pos.to_index()][i];
            self.shift(id, color, true);
        }
    }

    /// Exact inverse of [`apply_stone`](Self::apply_stone).
    pub fn revert_stone(&mut self, pos: Pos, color: Stone) {
        if !pos.on_board() || color == Stone::Empty {
            return;
        }
        for i in 0..self.by_cell[pos.to_index()].len() {
            let id = self.by_cell[pos.to_index()][i];
            self.shift(id, color, false);
        }
    }

    /// Move one road to its neighbouring bucket.
    fn shift(&mut self, id: RoadId, color: Stone, add: bool) {
        let road = &self.roads[id as usize];
        let from = bucket_index(road.black, road.white);

        // swap-remove from the old bucket, patching the slot of the road moved into the hole
        let slot = self.slots[id as usize] as usize;
        let bucket = &mut self.buckets[from];
        bucket.swap_remove(slot);
        if let Some(&moved) = bucket.get(slot) {
            self.slots[moved as usize] = slot as u16;
        }

        let road = &mut self.roads[id as usize];
        let counter = match color {
            Stone::Black => &mut road.black,
            _ => &mut road.white,
        };
        debug_assert!(if add { *counter < ROAD_LEN as u8 } else { *counter > 0 });
        if add {
            *counter += 1;
        } else {
            *counter -= 1;
        }

        let to = bucket_index(road.black, road.white);
        self.slots[id as usize] = self.buckets[to].len() as u16;
        self.buckets[to].push(id);
    }

    /// Roads with exactly `black` black and `white` white stones.
    /// Counts above six yield an empty slice.
    #[inline]
    pub fn bucket(&self, black: u8, white: u8) -> &[RoadId] {
        if black as usize >= COUNTS || white as usize >= COUNTS {
            return &[];
        }
        &self.buckets[bucket_index(black, white)]
    }

    /// Live roads of `color`: exactly `count` own stones and none of the opponent's.
    #[inline]
    pub fn live(&self, color: Stone, count: u8) -> &[RoadId] {
        match color {
            Stone::Black => self.bucket(count, 0),
            Stone::White => self.bucket(0, count),
            Stone::Empty => &[],
        }
    }

    #[inline]
    pub fn road(&self, id: RoadId) -> &Road {
        &self.roads[id as usize]
    }

    /// Roads through `pos`; empty for off-board cells.
    #[inline]
    pub fn roads_through(&self, pos: Pos) -> &[RoadId] {
        if !pos.on_board() {
            return &[];
        }
        &self.by_cell[pos.to_index()]
    }

    /// Whether any road through `pos` is a completed six of `color`.
    pub fn completes_six(&self, pos: Pos, color: Stone) -> bool {
        self.roads_through(pos)
            .iter()
            .any(|&id| self.road(id).count(color) == ROAD_LEN as u8)
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.roads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }
}

impl Default for RoadTable {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn bucket_index(black: u8, white: u8) -> usize {
    black as usize * COUNTS + white as usize
}

/// Roads a single cell can lie on at most.
pub const MAX_ROADS_PER_CELL: usize = DIRECTIONS.len() * ROAD_LEN;
