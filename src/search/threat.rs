//! Threat oracle over the line index
//!
//! Answers the tactical questions every phase of the engine asks:
//! - Can `color` complete a six this turn? ([`has_win_in_one`], [`find_immediate_win`])
//! - How many stones does the defender need to neutralise every opponent
//!   road holding four or five stones? ([`threat_level`])
//! - Which cells do that? ([`blocking_cells`], [`win_spots`])
//! - Where can `color` build new threats? ([`potential_cells`])
//!
//! A *threat road* is a live road of the attacker holding 4 or 5 stones.
//! Placing a defender stone on one of its empty cells removes exactly the
//! threat roads containing that cell, so the threat level is a set-cover
//! question over the threat roads' empty cells. It is answered with one
//! bitmask per cell and never touches the index.

use crate::board::road::MAX_ROADS_PER_CELL;
use crate::board::{Move, Pos, Position, RoadId, RoadTable, Stone, TOTAL_CELLS};
use crate::eval::best_cell;

/// Threat level meaning "no single two-stone move neutralises every threat".
pub const UNSTOPPABLE: u8 = 3;

/// More threat roads than two cells can lie on: always unstoppable.
const MAX_COVERABLE: usize = 2 * MAX_ROADS_PER_CELL;

/// Whether `color` has a live road of four or five stones, i.e. can
/// complete a six with its next move.
#[inline]
pub fn has_win_in_one(roads: &RoadTable, color: Stone) -> bool {
    !roads.live(color, 4).is_empty() || !roads.live(color, 5).is_empty()
}

/// Threat roads of `attacker`: fives first, then fours.
fn threat_roads(roads: &RoadTable, attacker: Stone) -> Vec<RoadId> {
    let mut ids = Vec::new();
    ids.extend_from_slice(roads.live(attacker, 5));
    ids.extend_from_slice(roads.live(attacker, 4));
    ids
}

fn empty_cells_of(pos: &Position, id: RoadId) -> impl Iterator<Item = Pos> + '_ {
    pos.roads()
        .road(id)
        .cells()
        .iter()
        .copied()
        .filter(|&cell| pos.is_empty(cell))
}

/// A winning move for `color`, if one exists.
///
/// A four-road's two empty cells win outright. A five-road's empty cell
/// wins with any second stone; the positionally best other cell is used.
/// Lowest road ids are preferred so the answer is reproducible.
pub fn find_immediate_win(pos: &Position, color: Stone) -> Option<Move> {
    let roads = pos.roads();

    if let Some(&id) = roads.live(color, 4).iter().min() {
        let mut empties = empty_cells_of(pos, id);
        if let (Some(a), Some(b)) = (empties.next(), empties.next()) {
            return Some(Move::new(a, b));
        }
    }

    let &id = roads.live(color, 5).iter().min()?;
    let cell = empty_cells_of(pos, id).next()?;
    let filler = best_cell(pos, Some(cell), color)?;
    Some(Move::new(cell, filler))
}

/// Empty cells of the threat roads with their coverage.
struct Coverage {
    threats: usize,
    /// `(cell, bitmask of covered threat roads, covered count)`, best first.
    /// Masks are only meaningful when `threats <= 64`.
    cells: Vec<(Pos, u64, u32)>,
}

impl Coverage {
    fn build(pos: &Position, attacker: Stone) -> Self {
        let ids = threat_roads(pos.roads(), attacker);
        let mut slot = [usize::MAX; TOTAL_CELLS];
        let mut cells: Vec<(Pos, u64, u32)> = Vec::new();

        for (bit, &id) in ids.iter().enumerate() {
            for cell in empty_cells_of(pos, id) {
                let idx = cell.to_index();
                if slot[idx] == usize::MAX {
                    slot[idx] = cells.len();
                    cells.push((cell, 0, 0));
                }
                let entry = &mut cells[slot[idx]];
                if bit < 64 {
                    entry.1 |= 1 << bit;
                }
                entry.2 += 1;
            }
        }

        cells.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
        Self {
            threats: ids.len(),
            cells,
        }
    }

    fn full(&self) -> u64 {
        if self.threats >= 64 {
            u64::MAX
        } else {
            (1u64 << self.threats) - 1
        }
    }

    fn level(&self) -> u8 {
        if self.threats == 0 {
            return 0;
        }
        if self.threats > MAX_COVERABLE {
            return UNSTOPPABLE;
        }
        let full = self.full();
        if self.cells.iter().any(|c| c.1 == full) {
            return 1;
        }
        for (i, a) in self.cells.iter().enumerate() {
            for b in &self.cells[i + 1..] {
                if a.1 | b.1 == full {
                    return 2;
                }
            }
        }
        UNSTOPPABLE
    }
}

/// Minimum number of `defender` stones that neutralise every threat road of
/// the opponent: 0, 1, 2, or [`UNSTOPPABLE`].
///
/// Exact: level 3 means no pair of cells (threat cells or otherwise) leaves
/// the opponent without a four or five.
pub fn threat_level(pos: &Position, defender: Stone) -> u8 {
    let attacker = defender.opponent();
    if !has_win_in_one(pos.roads(), attacker) {
        return 0;
    }
    Coverage::build(pos, attacker).level()
}

/// Cells where `color` could complete a six: the empty cells of its threat
/// roads, ordered by how many threat roads each lies on, then by index.
pub fn win_spots(pos: &Position, color: Stone) -> Vec<Pos> {
    if !has_win_in_one(pos.roads(), color) {
        return Vec::new();
    }
    Coverage::build(pos, color)
        .cells
        .into_iter()
        .map(|(cell, _, _)| cell)
        .collect()
}

/// Cells where `defender` can block: the opponent's [`win_spots`].
#[inline]
pub fn blocking_cells(pos: &Position, defender: Stone) -> Vec<Pos> {
    win_spots(pos, defender.opponent())
}

/// Blocking cells that alone neutralise every threat road.
pub fn single_blocks(pos: &Position, defender: Stone) -> Vec<Pos> {
    let attacker = defender.opponent();
    if !has_win_in_one(pos.roads(), attacker) {
        return Vec::new();
    }
    let coverage = Coverage::build(pos, attacker);
    let total = coverage.threats as u32;
    coverage
        .cells
        .into_iter()
        .filter(|c| c.2 == total)
        .map(|(cell, _, _)| cell)
        .collect()
}

/// Empty cells of `color`'s live two- and three-stone roads, weighted 1 and
/// 10 per road. Ordered by weight, then closeness to the center, then index.
pub fn potential_cells(pos: &Position, color: Stone) -> Vec<Pos> {
    let roads = pos.roads();
    let mut weight = [0u32; TOTAL_CELLS];

    for (count, w) in [(3u8, 10u32), (2, 1)] {
        for &id in roads.live(color, count) {
            for cell in empty_cells_of(pos, id) {
                weight[cell.to_index()] += w;
            }
        }
    }

    let mut cells: Vec<Pos> = (0..TOTAL_CELLS)
        .filter(|&i| weight[i] > 0)
        .map(Pos::from_index)
        .collect();
    cells.sort_by(|a, b| {
        weight[b.to_index()]
            .cmp(&weight[a.to_index()])
            .then(b.center_bonus().cmp(&a.center_bonus()))
            .then(a.cmp(b))
    });
    cells
}
