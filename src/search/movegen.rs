//! Move generation for the side to move
//!
//! Every generator draws only from cells that are empty when it runs, so
//! the moves it returns are legal by construction. Scoring is done by
//! trial: stones are counted on the line index (or fully played, where the
//! threat oracle needs the board) and taken back before returning.
//!
//! Ties keep candidate order (board index), so generation is deterministic.

use std::time::Instant;

use crate::board::{Move, Pos, Position, Stone};
use crate::eval::{best_cell, road_score, RoadScore};

use super::threat::{blocking_cells, potential_cells, single_blocks, threat_level};

/// Cells kept after single-stone ranking at interior nodes.
pub const NODE_CELLS: usize = 16;
/// Cells kept after single-stone ranking at the root.
pub const ROOT_CELLS: usize = 24;
/// Pairs kept after two-stone ranking.
pub const MAX_MOVES: usize = 35;
/// Blocking moves kept at a threatened node.
pub const MAX_BLOCKS: usize = 20;

#[inline]
fn expired(deadline: Instant) -> bool {
    Instant::now() >= deadline
}

/// Candidate cells ranked by the mover's road score after one trial stone.
fn rank_cells(pos: &mut Position, color: Stone, keep: usize) -> Vec<Pos> {
    let mut scored: Vec<(Pos, i32)> = pos
        .candidate_cells()
        .into_iter()
        .map(|cell| {
            let score = pos.with_trial_stones(&[cell], color, |roads| road_score(roads, color));
            (cell, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(keep);
    scored.into_iter().map(|(cell, _)| cell).collect()
}

/// All pairs of `cells` ranked by the road score after both trial stones.
fn rank_pairs(pos: &mut Position, cells: &[Pos], color: Stone) -> Vec<(Move, i32)> {
    let mut scored = Vec::with_capacity(cells.len() * cells.len() / 2);
    for (i, &a) in cells.iter().enumerate() {
        for &b in &cells[i + 1..] {
            let score = pos.with_trial_stones(&[a, b], color, |roads| road_score(roads, color));
            scored.push((Move::new(a, b), score));
        }
    }
    scored.sort_by(|x, y| y.1.cmp(&x.1));
    scored
}

/// Ranked moves for an interior search node.
///
/// Empty when fewer than two candidate cells exist.
pub fn generate(pos: &mut Position) -> Vec<Move> {
    let color = pos.side_to_move();
    let cells = rank_cells(pos, color, NODE_CELLS);
    let mut moves = rank_pairs(pos, &cells, color);
    moves.truncate(MAX_MOVES);
    moves.into_iter().map(|(mv, _)| mv).collect()
}

/// Ranked moves for the root.
///
/// A wider cell set than [`generate`], and each kept pair is re-ranked by
/// the threat level it inflicts on the opponent.
pub fn root_moves(pos: &mut Position) -> Vec<Move> {
    let color = pos.side_to_move();
    let cells = rank_cells(pos, color, ROOT_CELLS);
    let mut scored = rank_pairs(pos, &cells, color);
    scored.truncate(MAX_MOVES);

    for (mv, score) in scored.iter_mut() {
        pos.make_move(*mv);
        let inflicted = threat_level(pos, color.opponent()) as i32;
        pos.undo_move();
        *score = score.saturating_add(inflicted * RoadScore::THREAT);
    }
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(mv, _)| mv).collect()
}

/// Play `mv` for the threatened side to move and score it as a defence:
/// `None` if the threat survives, otherwise counter-threat inflicted on the
/// attacker first and evaluation second.
fn score_block(pos: &mut Position, mv: Move) -> Option<i32> {
    let defender = pos.side_to_move();
    pos.make_move(mv);
    let solved = threat_level(pos, defender) == 0;
    let score = solved.then(|| {
        let counter = threat_level(pos, defender.opponent()) as i32;
        (counter * RoadScore::THREAT).saturating_add(road_score(pos.roads(), defender))
    });
    pos.undo_move();
    score
}

/// Moves that neutralise every threat against the side to move, best first.
///
/// With a single blocking cell it is paired with nearby candidates; at
/// threat level 1 each single-cell block is paired with a few candidates;
/// otherwise every pair of blocking cells is tried. Empty when nothing
/// blocks (or the deadline passed before anything was found).
pub fn blocking_moves(pos: &mut Position, deadline: Instant) -> Vec<Move> {
    let defender = pos.side_to_move();
    let blocks = blocking_cells(pos, defender);
    if blocks.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(Move, i32)> = Vec::new();
    let mut try_pair = |pos: &mut Position, a: Pos, b: Pos| {
        let mv = Move::new(a, b);
        if let Some(score) = score_block(pos, mv) {
            scored.push((mv, score));
        }
    };

    if blocks.len() == 1 {
        let p1 = blocks[0];
        let seconds: Vec<Pos> = pos.candidate_cells().into_iter().filter(|&c| c != p1).collect();
        for &p2 in seconds.iter().take(8) {
            if expired(deadline) {
                break;
            }
            try_pair(pos, p1, p2);
        }
    } else if threat_level(pos, defender) == 1 {
        let seconds = pos.candidate_cells();
        for p1 in single_blocks(pos, defender).into_iter().take(6) {
            for &p2 in seconds.iter().filter(|&&c| c != p1).take(6) {
                if expired(deadline) {
                    break;
                }
                try_pair(pos, p1, p2);
            }
        }
    } else {
        'outer: for (i, &a) in blocks.iter().enumerate() {
            for &b in &blocks[i + 1..] {
                if expired(deadline) {
                    break 'outer;
                }
                try_pair(pos, a, b);
            }
        }
    }

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(MAX_BLOCKS);
    scored.into_iter().map(|(mv, _)| mv).collect()
}

/// The single best defence for the threatened side to move.
///
/// Second stones come from the defender's own potential cells, so the
/// block also builds. A lone blocking cell always yields a move, falling
/// back to the positionally best other cell.
pub fn best_block(pos: &mut Position, deadline: Instant) -> Option<Move> {
    let defender = pos.side_to_move();
    let blocks = blocking_cells(pos, defender);
    if blocks.is_empty() {
        return None;
    }

    let mut seconds = potential_cells(pos, defender);
    if seconds.is_empty() {
        seconds = pos.candidate_cells();
    }

    let mut best: Option<(Move, i32)> = None;

    if blocks.len() == 1 {
        let p1 = blocks[0];
        for &p2 in seconds.iter().filter(|&&c| c != p1).take(10) {
            consider(pos, &mut best, Move::new(p1, p2));
        }
        return best
            .map(|(mv, _)| mv)
            .or_else(|| best_cell(pos, Some(p1), defender).map(|p2| Move::new(p1, p2)));
    }

    if threat_level(pos, defender) == 1 {
        for p1 in single_blocks(pos, defender) {
            for &p2 in seconds.iter().take(18).filter(|&&c| c != p1).take(10) {
                if expired(deadline) {
                    break;
                }
                consider(pos, &mut best, Move::new(p1, p2));
            }
        }
        if best.is_some() {
            return best.map(|(mv, _)| mv);
        }
    }

    'outer: for (i, &a) in blocks.iter().enumerate() {
        for &b in &blocks[i + 1..] {
            if expired(deadline) {
                break 'outer;
            }
            consider(pos, &mut best, Move::new(a, b));
        }
    }
    best.map(|(mv, _)| mv)
}

/// Keep `mv` in `best` if it blocks and outscores the current choice.
fn consider(pos: &mut Position, best: &mut Option<(Move, i32)>, mv: Move) {
    if let Some(score) = score_block(pos, mv) {
        if best.map_or(true, |(_, s)| score > s) {
            *best = Some((mv, score));
        }
    }
}

/// The first two empty cells in index order. `None` on a full board.
pub fn any_legal_pair(pos: &Position) -> Option<Move> {
    let mut empties = pos.board().empty_cells();
    let a = empties.next()?;
    let b = empties.next()?;
    Some(Move::new(a, b))
}
