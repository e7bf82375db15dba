//! Principal variation search with iterative deepening
//!
//! Negamax with alpha-beta pruning over two-stone moves. Every node is
//! classified before any move is generated:
//!
//! - the previous mover completed a six: lost
//! - the side to move can complete a six: won
//! - the side to move faces an unstoppable threat: lost next turn
//! - the side to move faces a stoppable threat: only blocking moves
//!
//! Quiet nodes search the ranked moves of [`generate`], the first with a
//! full window and the rest with a zero-window probe. Scores are from the
//! side to move's point of view; mate scores shrink with distance from the
//! root.
//!
//! # Example
//!
//! ```
//! use connect6::board::Position;
//! use connect6::search::{SearchContext, Searcher};
//!
//! let mut pos = Position::new();
//! let mut ctx = SearchContext::new(1, &pos);
//! let mut searcher = Searcher::new();
//!
//! let result = searcher.search_fixed(&mut pos, &mut ctx, 2);
//! assert!(result.best_move.is_some());
//! ```

use std::time::{Duration, Instant};

use crate::board::{Move, Position};
use crate::eval::evaluate;

use super::movegen::{blocking_moves, generate, root_moves};
use super::threat::{find_immediate_win, has_win_in_one, threat_level, UNSTOPPABLE};
use super::{EntryType, SearchContext};

/// Infinity score for alpha-beta bounds
pub const INF: i32 = 10_000_000;

/// Score of a win at the root; deeper wins score less.
pub const WIN: i32 = INF - 1_000;

/// Scores beyond this are forced wins or losses.
pub const MATE_BOUND: i32 = WIN - 500;

/// Half-width of the aspiration window around the previous score.
const ASP_WINDOW: i32 = 5_000;

/// Time a threatened node may spend looking for blocks.
const BLOCK_BUDGET: Duration = Duration::from_millis(25);

#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_BOUND
}

/// Mate scores are stored relative to the node, not the root.
#[inline]
fn to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

#[inline]
fn from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

/// Move the preferred moves present in `moves` to the front, in order,
/// keeping the relative order of the rest.
fn promote(moves: &mut [Move], preferred: &[Option<Move>]) {
    let mut front = 0;
    for mv in preferred.iter().flatten() {
        if let Some(i) = moves[front..].iter().position(|m| m == mv) {
            moves[front..=front + i].rotate_right(1);
            front += 1;
        }
    }
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    /// Total TT probes
    pub tt_probes: u64,
    /// TT probes that returned a usable score (exact/bound hit)
    pub tt_score_hits: u64,
    /// TT probes that provided a best move for ordering
    pub tt_move_hits: u64,
    /// Root searches repeated after falling outside the aspiration window
    pub re_searches: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }

    /// TT score hit rate in percent
    pub fn tt_score_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_score_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found, if any
    pub best_move: Option<Move>,
    /// Evaluation score of the best move
    pub score: i32,
    /// Last fully completed depth (0 if none completed)
    pub depth: i8,
    /// Total nodes searched
    pub nodes: u64,
    /// Search diagnostics
    pub stats: SearchStats,
    /// Root moves, best first
    pub root_moves: Vec<Move>,
}

impl SearchResult {
    fn empty() -> Self {
        Self {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            stats: SearchStats::default(),
            root_moves: Vec::new(),
        }
    }
}

/// Single-threaded PVS searcher.
///
/// Holds only per-search counters; everything that persists between
/// searches lives in the [`SearchContext`] passed to each call.
pub struct Searcher {
    nodes: u64,
    stats: SearchStats,
    deadline: Instant,
    stopped: bool,
}

impl Searcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: 0,
            stats: SearchStats::default(),
            deadline: Instant::now(),
            stopped: false,
        }
    }

    fn start(&mut self, deadline: Instant) {
        self.nodes = 0;
        self.stats = SearchStats::default();
        self.deadline = deadline;
        self.stopped = false;
    }

    /// Check the deadline and latch the stop flag once it has passed.
    #[inline]
    fn check_time(&mut self) -> bool {
        if !self.stopped && Instant::now() >= self.deadline {
            self.stopped = true;
        }
        self.stopped
    }

    /// Search to `max_depth` without a time limit.
    #[must_use]
    pub fn search_fixed(
        &mut self,
        pos: &mut Position,
        ctx: &mut SearchContext,
        max_depth: i8,
    ) -> SearchResult {
        let deadline = Instant::now() + Duration::from_secs(3600);
        self.search(pos, ctx, 2.min(max_depth), max_depth, deadline, deadline)
    }

    /// Iterative deepening from `min_depth` to `max_depth` in steps of two.
    ///
    /// No new depth starts after `soft_stop`, and a depth still running at
    /// `deadline` is abandoned: the result is the last completed depth's.
    /// If not even the first depth completes, the best-ranked root move is
    /// returned with depth 0.
    pub fn search(
        &mut self,
        pos: &mut Position,
        ctx: &mut SearchContext,
        min_depth: i8,
        max_depth: i8,
        soft_stop: Instant,
        deadline: Instant,
    ) -> SearchResult {
        self.start(deadline);
        ctx.clear_killers();
        let me = pos.side_to_move();
        let mut best_result = SearchResult::empty();

        if pos.is_game_over() {
            return best_result;
        }
        if let Some(mv) = find_immediate_win(pos, me) {
            best_result.best_move = Some(mv);
            best_result.score = WIN - 1;
            best_result.root_moves = vec![mv];
            return best_result;
        }

        let mut moves = if threat_level(pos, me) > 0 {
            let blocks = blocking_moves(pos, (Instant::now() + BLOCK_BUDGET).min(deadline));
            if blocks.is_empty() {
                root_moves(pos)
            } else {
                blocks
            }
        } else {
            root_moves(pos)
        };
        promote(&mut moves, &[ctx.tt().get_best_move(ctx.hash())]);
        best_result.best_move = moves.first().copied();
        if moves.is_empty() {
            return best_result;
        }

        let search_start = Instant::now();
        let mut prev_depth_time = Duration::ZERO;
        let mut depth = min_depth.max(1);

        while depth <= max_depth {
            if Instant::now() >= soft_stop || self.check_time() {
                break;
            }
            let depth_start = Instant::now();

            let center = (best_result.depth > 0).then_some(best_result.score);
            let (best_move, score) = self.aspiration_search(pos, ctx, &moves, depth, center);

            if self.stopped {
                log::trace!("pvs depth {} abandoned after {} nodes", depth, self.nodes);
                break;
            }

            if let Some(mv) = best_move {
                promote(&mut moves, &[Some(mv)]);
                best_result.best_move = Some(mv);
            }
            best_result.score = score;
            best_result.depth = depth;

            let depth_time = depth_start.elapsed();
            log::trace!(
                "pvs depth {} score {} nodes {} in {:?}",
                depth,
                score,
                self.nodes,
                depth_time
            );

            if is_mate_score(score) {
                break;
            }

            // Skip the next depth if it cannot finish in time
            let remaining = soft_stop.saturating_duration_since(Instant::now());
            let estimated_next = if prev_depth_time.as_millis() > 0 && depth_time.as_millis() > 0 {
                let bf = depth_time.as_millis() as f64 / prev_depth_time.as_millis().max(1) as f64;
                let bf = bf.clamp(1.5, 20.0);
                Duration::from_millis((depth_time.as_millis() as f64 * bf) as u64)
            } else {
                depth_time * 3
            };
            prev_depth_time = depth_time;
            if estimated_next > remaining {
                break;
            }
            depth += 2;
        }

        log::trace!("pvs finished in {:?}", search_start.elapsed());
        best_result.nodes = self.nodes;
        best_result.stats = self.stats.clone();
        best_result.root_moves = moves;
        best_result
    }

    /// Score the position for the side to move with a full-window search.
    pub fn probe(
        &mut self,
        pos: &mut Position,
        ctx: &mut SearchContext,
        depth: i8,
        deadline: Instant,
    ) -> i32 {
        self.start(deadline);
        self.pvs(pos, ctx, depth, 0, -INF, INF)
    }

    /// Nodes visited by the last search.
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Root-level search over a fixed move list.
    fn search_root(
        &mut self,
        pos: &mut Position,
        ctx: &mut SearchContext,
        moves: &[Move],
        depth: i8,
        mut alpha: i32,
        beta: i32,
    ) -> (Option<Move>, i32) {
        let alpha_orig = alpha;
        let mut best_move = None;
        let mut best_score = -INF;
        let hash = ctx.hash();

        for (i, &mv) in moves.iter().enumerate() {
            ctx.make_move(pos, mv);
            let score = if i == 0 {
                -self.pvs(pos, ctx, depth - 1, 1, -beta, -alpha)
            } else {
                let mut s = -self.pvs(pos, ctx, depth - 1, 1, -(alpha + 1), -alpha);
                if !self.stopped && s > alpha && s < beta {
                    s = -self.pvs(pos, ctx, depth - 1, 1, -beta, -alpha);
                }
                s
            };
            ctx.undo_move(pos);

            if self.stopped {
                break;
            }
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score >= beta {
                break;
            }
            alpha = alpha.max(score);
        }

        if !self.stopped {
            let entry_type = if best_score <= alpha_orig {
                EntryType::UpperBound
            } else if best_score >= beta {
                EntryType::LowerBound
            } else {
                EntryType::Exact
            };
            ctx.tt_mut()
                .store(hash, depth, to_tt(best_score, 0), entry_type, best_move);
        }
        (best_move, best_score)
    }

    /// Root search in a window of `ASP_WINDOW` around `center`, widening the
    /// failed side to infinity and searching again on a fail-low or fail-high.
    /// Mate scores and a missing center use the full window.
    fn aspiration_search(
        &mut self,
        pos: &mut Position,
        ctx: &mut SearchContext,
        moves: &[Move],
        depth: i8,
        center: Option<i32>,
    ) -> (Option<Move>, i32) {
        let (mut alpha, mut beta) = match center {
            Some(c) if !is_mate_score(c) => (c - ASP_WINDOW, c + ASP_WINDOW),
            _ => (-INF, INF),
        };

        loop {
            let (best_move, score) = self.search_root(pos, ctx, moves, depth, alpha, beta);
            if self.stopped {
                return (best_move, score);
            }
            if score <= alpha {
                alpha = -INF;
            } else if score >= beta {
                beta = INF;
            } else {
                return (best_move, score);
            }
            self.stats.re_searches += 1;
        }
    }

    fn pvs(
        &mut self,
        pos: &mut Position,
        ctx: &mut SearchContext,
        depth: i8,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;
        if self.check_time() {
            return 0;
        }

        let me = pos.side_to_move();
        let distance = ply as i32;
        if pos.is_game_over() {
            return -(WIN - distance);
        }
        if has_win_in_one(pos.roads(), me) {
            return WIN - distance - 1;
        }
        let level = threat_level(pos, me);
        if level >= UNSTOPPABLE {
            return -(WIN - distance - 2);
        }
        if depth <= 0 {
            return evaluate(pos, me);
        }

        let hash = ctx.hash();
        self.stats.tt_probes += 1;
        let probe = ctx
            .tt()
            .probe(hash, depth, to_tt(alpha, ply), to_tt(beta, ply));
        if let Some(score) = probe.and_then(|p| p.score) {
            self.stats.tt_score_hits += 1;
            return from_tt(score, ply);
        }
        let tt_move = probe.and_then(|p| p.best_move);
        if tt_move.is_some() {
            self.stats.tt_move_hits += 1;
        }

        // Threatened: blocking is mandatory
        let mut moves = if level > 0 {
            let blocks = blocking_moves(pos, (Instant::now() + BLOCK_BUDGET).min(self.deadline));
            if self.check_time() {
                return 0;
            }
            if blocks.is_empty() {
                return -(WIN - distance - 2);
            }
            blocks
        } else {
            generate(pos)
        };
        if moves.is_empty() {
            return evaluate(pos, me);
        }
        let [k1, k2] = ctx.killers(ply);
        promote(&mut moves, &[tt_move, k1, k2]);

        let alpha_orig = alpha;
        let mut best_score = -INF;
        let mut best_move = None;

        for (i, &mv) in moves.iter().enumerate() {
            ctx.make_move(pos, mv);
            let score = if i == 0 {
                -self.pvs(pos, ctx, depth - 1, ply + 1, -beta, -alpha)
            } else {
                let mut s = -self.pvs(pos, ctx, depth - 1, ply + 1, -(alpha + 1), -alpha);
                if !self.stopped && s > alpha && s < beta {
                    s = -self.pvs(pos, ctx, depth - 1, ply + 1, -beta, -alpha);
                }
                s
            };
            ctx.undo_move(pos);

            if self.stopped {
                return 0;
            }
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                if level == 0 {
                    ctx.record_killer(ply, mv);
                }
                break;
            }
        }

        let entry_type = if best_score <= alpha_orig {
            EntryType::UpperBound
        } else if best_score >= beta {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        };
        ctx.tt_mut()
            .store(hash, depth, to_tt(best_score, ply), entry_type, best_move);
        best_score
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Pos, Stone};

    fn position(stones: &[(u8, u8, Stone)], side: Stone) -> Position {
        let mut board = Board::new();
        for &(r, c, s) in stones {
            board.set(Pos::new(r, c), s);
        }
        Position::from_board(board, side)
    }

    fn setup(stones: &[(u8, u8, Stone)], side: Stone) -> (Position, SearchContext) {
        let pos = position(stones, side);
        let ctx = SearchContext::new(1, &pos);
        (pos, ctx)
    }

    #[test]
    fn test_search_initial_position() {
        let (mut pos, mut ctx) = setup(&[], Stone::White);
        let hash_before = ctx.hash();
        let result = Searcher::new().search_fixed(&mut pos, &mut ctx, 2);

        let mv = result.best_move.unwrap();
        assert!(pos.is_legal(mv));
        assert_eq!(result.depth, 2);
        assert_eq!(result.root_moves.first(), Some(&mv));
        assert!(result.nodes > 0);
        assert!(pos.history().is_empty());
        assert_eq!(ctx.hash(), hash_before);
    }

    #[test]
    fn test_search_finds_winning_move() {
        let stones: Vec<_> = (0..4).map(|c| (2u8, c, Stone::White)).collect();
        let (mut pos, mut ctx) = setup(&stones, Stone::White);
        let result = Searcher::new().search_fixed(&mut pos, &mut ctx, 4);

        let mv = result.best_move.unwrap();
        assert!(result.score >= MATE_BOUND);
        pos.make_move(mv);
        assert_eq!(pos.winner(), Some(Stone::White));
    }

    #[test]
    fn test_search_blocks_opponent_four() {
        let stones: Vec<_> = (0..4).map(|c| (2u8, c, Stone::Black)).collect();
        let (mut pos, mut ctx) = setup(&stones, Stone::White);
        let result = Searcher::new().search_fixed(&mut pos, &mut ctx, 2);

        let mv = result.best_move.unwrap();
        pos.make_move(mv);
        assert_eq!(threat_level(&pos, Stone::White), 0);
    }

    #[test]
    fn test_unstoppable_threat_scores_as_loss() {
        let mut stones = Vec::new();
        for row in [0u8, 6, 12] {
            stones.extend((0..4).map(|c| (row, c, Stone::White)));
        }
        let (mut pos, mut ctx) = setup(&stones, Stone::Black);
        let deadline = Instant::now() + Duration::from_secs(10);
        let score = Searcher::new().probe(&mut pos, &mut ctx, 4, deadline);
        assert!(score <= -MATE_BOUND);
    }

    #[test]
    fn test_search_losing_score() {
        // White cannot stop three fours, and every root block fails
        let mut stones = Vec::new();
        for row in [0u8, 6, 12] {
            stones.extend((0..4).map(|c| (row, c, Stone::Black)));
        }
        let (mut pos, mut ctx) = setup(&stones, Stone::White);
        let result = Searcher::new().search_fixed(&mut pos, &mut ctx, 2);
        assert!(result.best_move.is_some());
        assert!(result.score <= -MATE_BOUND);
    }

    #[test]
    fn test_expired_deadline_still_returns_move() {
        let (mut pos, mut ctx) = setup(&[], Stone::White);
        let hash_before = ctx.hash();
        let now = Instant::now();
        let result = Searcher::new().search(&mut pos, &mut ctx, 2, 10, now, now);

        let mv = result.best_move.unwrap();
        assert!(pos.is_legal(mv));
        assert_eq!(result.depth, 0);
        assert!(pos.history().is_empty());
        assert_eq!(ctx.hash(), hash_before);
    }

    #[test]
    fn test_tt_used_after_search() {
        let (mut pos, mut ctx) = setup(&[], Stone::White);
        let _ = Searcher::new().search_fixed(&mut pos, &mut ctx, 2);
        assert!(ctx.tt_stats().used > 0);
        assert!(ctx.tt().get_best_move(ctx.hash()).is_some());
    }

    #[test]
    fn test_tt_score_rate_on_repeat_search() {
        let (mut pos, mut ctx) = setup(&[], Stone::White);
        let mut searcher = Searcher::new();
        let _ = searcher.search_fixed(&mut pos, &mut ctx, 2);
        let second = searcher.search_fixed(&mut pos, &mut ctx, 2);
        assert!(second.stats.tt_probes > 0);
        assert!(second.stats.tt_score_rate() > 0.0);
    }

    fn full_window_score(depth: i8) -> i32 {
        let (mut pos, mut ctx) = setup(&[], Stone::White);
        let moves = root_moves(&mut pos);
        let mut searcher = Searcher::new();
        searcher.start(Instant::now() + Duration::from_secs(3600));
        let (_, score) = searcher.search_root(&mut pos, &mut ctx, &moves, depth, -INF, INF);
        score
    }

    #[test]
    fn test_aspiration_fail_low_re_search() {
        let full = full_window_score(2);
        let (mut pos, mut ctx) = setup(&[], Stone::White);
        let moves = root_moves(&mut pos);
        let mut searcher = Searcher::new();
        searcher.start(Instant::now() + Duration::from_secs(3600));

        let (best, score) =
            searcher.aspiration_search(&mut pos, &mut ctx, &moves, 2, Some(full + 3 * ASP_WINDOW));
        assert_eq!(score, full);
        assert!(best.is_some());
        assert_eq!(searcher.stats.re_searches, 1);
    }

    #[test]
    fn test_aspiration_fail_high_re_search() {
        let full = full_window_score(2);
        let (mut pos, mut ctx) = setup(&[], Stone::White);
        let moves = root_moves(&mut pos);
        let mut searcher = Searcher::new();
        searcher.start(Instant::now() + Duration::from_secs(3600));

        let (best, score) =
            searcher.aspiration_search(&mut pos, &mut ctx, &moves, 2, Some(full - 3 * ASP_WINDOW));
        assert_eq!(score, full);
        assert!(best.is_some());
        assert_eq!(searcher.stats.re_searches, 1);
    }

    #[test]
    fn test_aspiration_mate_center_uses_full_window() {
        let full = full_window_score(2);
        let (mut pos, mut ctx) = setup(&[], Stone::White);
        let moves = root_moves(&mut pos);
        let mut searcher = Searcher::new();
        searcher.start(Instant::now() + Duration::from_secs(3600));

        let (_, score) = searcher.aspiration_search(&mut pos, &mut ctx, &moves, 2, Some(WIN - 3));
        assert_eq!(score, full);
        assert_eq!(searcher.stats.re_searches, 0);
    }

    #[test]
    fn test_root_fail_low_stored_as_upper_bound() {
        let full = full_window_score(2);
        let (mut pos, mut ctx) = setup(&[], Stone::White);
        let moves = root_moves(&mut pos);
        let mut searcher = Searcher::new();
        searcher.start(Instant::now() + Duration::from_secs(3600));

        let (alpha, beta) = (full + 10_000, full + 20_000);
        let (_, score) = searcher.search_root(&mut pos, &mut ctx, &moves, 2, alpha, beta);
        assert!(score <= alpha);

        let hash = ctx.hash();
        let wide = ctx.tt().probe(hash, 2, -INF, INF).unwrap();
        assert_eq!(wide.score, None);
        let narrow = ctx.tt().probe(hash, 2, alpha, beta).unwrap();
        assert_eq!(narrow.score, Some(score));
    }

    #[test]
    fn test_mate_score_conversion() {
        let score = WIN - 7;
        assert_eq!(from_tt(to_tt(score, 5), 5), score);
        assert_eq!(from_tt(to_tt(-score, 3), 3), -score);
        assert_eq!(to_tt(1234, 9), 1234);
        assert!(is_mate_score(WIN - 10));
        assert!(!is_mate_score(crate::eval::RoadScore::LIMIT));
    }

    #[test]
    fn test_promote_keeps_order() {
        let a = Move::new(Pos::new(0, 0), Pos::new(0, 1));
        let b = Move::new(Pos::new(1, 0), Pos::new(1, 1));
        let c = Move::new(Pos::new(2, 0), Pos::new(2, 1));
        let d = Move::new(Pos::new(3, 0), Pos::new(3, 1));
        let mut moves = vec![a, b, c, d];
        promote(&mut moves, &[Some(c), None, Some(d)]);
        assert_eq!(moves, vec![c, d, a, b]);
    }
}
