//! Double-threat space search: a proof search for forced wins
//!
//! The attacker (the side to move at the root) only plays moves that leave
//! the defender facing a threat level of at least 2, so the defender's
//! replies are restricted to pairs that neutralise every threat. An
//! attacker node succeeds if one move works; a defender node succeeds only
//! if every blocking reply still loses.
//!
//! The search mutates the position in place and undoes every move before
//! returning, including when the deadline cuts it short.

use std::time::Instant;

use crate::board::{Move, Pos, Position, Stone};
use crate::eval::{road_score, RoadScore};

use super::threat::{
    blocking_cells, find_immediate_win, has_win_in_one, potential_cells, threat_level,
    UNSTOPPABLE,
};

/// Attacker cells considered for candidate pairs.
const DEFAULT_MAX_POINTS: usize = 32;
/// Attacker moves kept per node after ranking.
const DEFAULT_MAX_MOVES: usize = 80;

/// Outcome of a proof attempt
#[derive(Debug, Clone)]
pub struct ProofResult {
    /// First move of the forced win, if one was proven
    pub first_move: Option<Move>,
    /// Depth of the attempt that produced the result
    pub depth: i32,
    /// The deadline cut the search short
    pub timed_out: bool,
    pub nodes: u64,
}

impl ProofResult {
    #[inline]
    fn not_found(depth: i32, timed_out: bool, nodes: u64) -> Self {
        Self {
            first_move: None,
            depth,
            timed_out,
            nodes,
        }
    }

    #[inline]
    fn found(mv: Move, depth: i32, nodes: u64) -> Self {
        Self {
            first_move: Some(mv),
            depth,
            timed_out: false,
            nodes,
        }
    }

    #[inline]
    pub fn is_proven(&self) -> bool {
        self.first_move.is_some()
    }
}

/// Forced-win prover for the side to move
pub struct ForcedWinProver {
    max_points: usize,
    max_moves: usize,
    nodes: u64,
    attacker: Stone,
    deadline: Instant,
    timed_out: bool,
}

impl ForcedWinProver {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_POINTS, DEFAULT_MAX_MOVES)
    }

    /// Prover with custom candidate caps.
    pub fn with_limits(max_points: usize, max_moves: usize) -> Self {
        Self {
            max_points: max_points.max(2),
            max_moves: max_moves.max(1),
            nodes: 0,
            attacker: Stone::Empty,
            deadline: Instant::now(),
            timed_out: false,
        }
    }

    /// Nodes visited by the last proof attempt.
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Try to prove a forced win for the side to move within `depth` plies.
    ///
    /// An immediate win is a proof of any depth. A timeout reports no proof.
    pub fn prove(&mut self, pos: &mut Position, depth: i32, deadline: Instant) -> ProofResult {
        self.nodes = 0;
        self.timed_out = false;
        self.deadline = deadline;
        self.attacker = pos.side_to_move();

        if self.check_time() {
            return ProofResult::not_found(depth, true, self.nodes);
        }
        // The previous mover completed a six
        if pos.is_game_over() {
            return ProofResult::not_found(depth, false, self.nodes);
        }
        if let Some(mv) = find_immediate_win(pos, self.attacker) {
            return ProofResult::found(mv, depth, 1);
        }
        if depth <= 0 {
            return ProofResult::not_found(depth, false, self.nodes);
        }

        self.nodes += 1;
        for mv in self.attack_moves(pos) {
            pos.make_move(mv);
            let proven = self.defend(pos, depth - 1);
            pos.undo_move();
            if proven {
                return ProofResult::found(mv, depth, self.nodes);
            }
            if self.timed_out {
                break;
            }
        }
        ProofResult::not_found(depth, self.timed_out, self.nodes)
    }

    /// Prove at increasing odd depths until a win is found, the depths run
    /// out or the deadline passes. Node counts accumulate across attempts.
    pub fn prove_iterative(
        &mut self,
        pos: &mut Position,
        min_depth: i32,
        max_depth: i32,
        deadline: Instant,
    ) -> ProofResult {
        let mut total = 0;
        let mut last = ProofResult::not_found(min_depth, false, 0);
        let mut depth = min_depth.max(1);

        while depth <= max_depth {
            let result = self.prove(pos, depth, deadline);
            total += result.nodes;
            log::trace!(
                "dtss depth {} nodes {} proven {} timed out {}",
                depth,
                result.nodes,
                result.is_proven(),
                result.timed_out
            );
            last = result;
            if last.is_proven() || last.timed_out {
                break;
            }
            depth += 2;
        }

        last.nodes = total;
        self.nodes = total;
        last
    }

    #[inline]
    fn check_time(&mut self) -> bool {
        if !self.timed_out && Instant::now() >= self.deadline {
            self.timed_out = true;
        }
        self.timed_out
    }

    /// Attacker to move: one double-threat move must lead to a win.
    fn attack(&mut self, pos: &mut Position, depth: i32) -> bool {
        self.nodes += 1;
        if self.check_time() {
            return false;
        }
        if let Some(winner) = pos.winner() {
            return winner == self.attacker;
        }
        if has_win_in_one(pos.roads(), self.attacker) {
            return true;
        }
        if depth <= 0 {
            return false;
        }

        for mv in self.attack_moves(pos) {
            pos.make_move(mv);
            let proven = self.defend(pos, depth - 1);
            pos.undo_move();
            if proven {
                return true;
            }
            if self.timed_out {
                return false;
            }
        }
        false
    }

    /// Defender to move: every neutralising reply must still lose.
    fn defend(&mut self, pos: &mut Position, depth: i32) -> bool {
        self.nodes += 1;
        if self.check_time() {
            return false;
        }
        if let Some(winner) = pos.winner() {
            return winner == self.attacker;
        }
        let defender = self.attacker.opponent();
        if has_win_in_one(pos.roads(), defender) {
            return false;
        }

        let level = threat_level(pos, defender);
        if level >= UNSTOPPABLE {
            return true;
        }
        debug_assert!(level >= 2, "attacker move left threat level {level}");
        if depth <= 0 {
            return false;
        }

        let replies = self.defence_moves(pos);
        if self.timed_out {
            return false;
        }
        for mv in replies {
            pos.make_move(mv);
            let proven = self.attack(pos, depth - 1);
            pos.undo_move();
            if !proven {
                return false;
            }
        }
        true
    }

    /// Attacker moves leaving the defender at threat level 2 or more and
    /// without a win of its own, strongest first.
    fn attack_moves(&mut self, pos: &mut Position) -> Vec<Move> {
        let attacker = self.attacker;
        let defender = attacker.opponent();
        if threat_level(pos, attacker) >= UNSTOPPABLE {
            return Vec::new();
        }

        let cells: Vec<Pos> = potential_cells(pos, attacker)
            .into_iter()
            .take(self.max_points)
            .collect();
        let mut scored: Vec<(Move, i32)> = Vec::new();

        'outer: for (i, &a) in cells.iter().enumerate() {
            for &b in &cells[i + 1..] {
                if self.check_time() {
                    break 'outer;
                }
                let mv = Move::new(a, b);
                pos.make_move(mv);
                if !has_win_in_one(pos.roads(), defender) {
                    let level = threat_level(pos, defender);
                    if level >= 2 {
                        let score = (level as i32 * RoadScore::THREAT)
                            .saturating_add(road_score(pos.roads(), attacker));
                        scored.push((mv, score));
                    }
                }
                pos.undo_move();
            }
        }

        scored.sort_by(|x, y| y.1.cmp(&x.1));
        scored.truncate(self.max_moves);
        scored.into_iter().map(|(mv, _)| mv).collect()
    }

    /// Defender replies that bring the threat level to zero, best first.
    ///
    /// The defender faces level 2, so both stones must land on blocking cells.
    fn defence_moves(&mut self, pos: &mut Position) -> Vec<Move> {
        let defender = self.attacker.opponent();
        let blocks = blocking_cells(pos, defender);

        let mut pairs: Vec<Move> = Vec::new();
        for (i, &a) in blocks.iter().enumerate() {
            for &b in &blocks[i + 1..] {
                pairs.push(Move::new(a, b));
            }
        }

        let mut scored: Vec<(Move, i32)> = Vec::new();
        for mv in pairs {
            if self.check_time() {
                break;
            }
            pos.make_move(mv);
            if threat_level(pos, defender) == 0 {
                scored.push((mv, road_score(pos.roads(), defender)));
            }
            pos.undo_move();
        }

        scored.sort_by(|x, y| y.1.cmp(&x.1));
        scored.into_iter().map(|(mv, _)| mv).collect()
    }
}

impl Default for ForcedWinProver {
    fn default() -> Self {
        Self::new()
    }
}
