//! Heuristic evaluation over the line index
//!
//! This module provides the evaluation used by the principal search and by
//! move ordering. It reads the road buckets only, never the board:
//! - Road scoring with asymmetric attack/defence tables
//! - Perspective-symmetric position evaluation for negamax
//! - Single-cell spot scores for filler and block stones

use crate::board::{Pos, Position, RoadTable, Stone};

use super::patterns::{line_score, POW};

/// Live road counts of `color`, indexed by stone count.
#[inline]
fn live_counts(roads: &RoadTable, color: Stone) -> [usize; 7] {
    let mut counts = [0usize; 7];
    for (n, slot) in counts.iter_mut().enumerate() {
        *slot = roads.live(color, n as u8).len();
    }
    counts
}

/// Score the index for `color`: own live roads at attack weights minus
/// opponent live roads at defence weights.
///
/// Not symmetric on its own: `road_score(r, Black) != -road_score(r, White)`
/// in general. Use [`evaluate`] where negamax symmetry is needed.
#[must_use]
pub fn road_score(roads: &RoadTable, color: Stone) -> i32 {
    line_score(&live_counts(roads, color), &live_counts(roads, color.opponent()))
}

/// Evaluate the position from the perspective of the given color.
///
/// The asymmetric road score is taken for the side to move and negated for
/// the other color, so `evaluate(p, Black) == -evaluate(p, White)` holds
/// exactly while the side to move still sees defence weighted above attack.
///
/// # Arguments
/// * `pos` - The current position
/// * `perspective` - The color to evaluate for
///
/// # Returns
/// Positive values favour `perspective`. Bounded by `RoadScore::LIMIT`.
#[must_use]
pub fn evaluate(pos: &Position, perspective: Stone) -> i32 {
    let mover = pos.side_to_move();
    let score = road_score(pos.roads(), mover);
    if perspective == mover {
        score
    } else {
        -score
    }
}

/// Positional value of a stone of `color` on the empty cell `pos`.
///
/// Each road through the cell adds `10^n` for `n` own stones when the
/// opponent has none there, and `2 * 10^n` for `n` opponent stones when
/// `color` has none there. The center bonus breaks ties toward the middle.
#[must_use]
pub fn spot_score(roads: &RoadTable, pos: Pos, color: Stone) -> i32 {
    let opp = color.opponent();
    let mut score = 0;
    for &id in roads.roads_through(pos) {
        let road = roads.road(id);
        let mine = road.count(color) as usize;
        let theirs = road.count(opp) as usize;
        if theirs == 0 && mine > 0 {
            score += POW[mine.min(6)];
        }
        if mine == 0 && theirs > 0 {
            score += POW[theirs.min(6)] * 2;
        }
    }
    score + pos.center_bonus()
}

/// Best single cell for `color` among the candidate cells, skipping
/// `exclude`. Ties go to the lowest index. Falls back to any empty cell;
/// `None` only when no other empty cell exists.
#[must_use]
pub fn best_cell(pos: &Position, exclude: Option<Pos>, color: Stone) -> Option<Pos> {
    let mut best: Option<(Pos, i32)> = None;
    for cell in pos.candidate_cells() {
        if Some(cell) == exclude {
            continue;
        }
        let score = spot_score(pos.roads(), cell, color);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((cell, score));
        }
    }
    best.map(|(cell, _)| cell)
        .or_else(|| pos.board().empty_cells().find(|&c| Some(c) != exclude))
}
