//! Move orchestrator integrating all search components
//!
//! The engine owns the game: board, line index, hash and transposition
//! table persist between turns. Each turn runs a fixed pipeline and stops
//! at the first phase that commits a move:
//!
//! 1. **Immediate win**: complete a six
//! 2. **Defense**: the opponent can complete a six next turn, block it
//! 3. **Forced win**: the prover finds a double-threat sequence
//! 4. **Principal search**: PVS, followed by a safety check of the chosen
//!    move against the opponent's prover
//! 5. **Fallback**: any legal pair
//!
//! # Example
//!
//! ```
//! use connect6::{Engine, EngineConfig};
//!
//! let mut engine = Engine::with_config(EngineConfig::with_time_limit(500)).unwrap();
//! let mv = engine.decide_move(None).unwrap();
//! assert_eq!(engine.position().last_move(), Some(mv));
//! ```

use std::time::{Duration, Instant};

use crate::board::{Move, Position};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::eval::{best_cell, RoadScore};
use crate::search::movegen::{any_legal_pair, best_block};
use crate::search::{
    find_immediate_win, is_mate_score, threat_level, win_spots, ForcedWinProver, SearchContext,
    SearchResult, Searcher, TTStats, WIN,
};

/// Phase of the pipeline that produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Completes a six
    ImmediateWin,
    /// Blocks the opponent's threats
    Defense,
    /// First move of a proven forced win
    ForcedWin,
    /// Principal search result
    Principal,
    /// Nothing else produced a move
    Fallback,
}

/// Result of a move decision with detailed statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    pub best_move: Move,
    /// Score from the mover's point of view
    pub score: i32,
    pub search_type: SearchType,
    /// Prover or search depth reached (0 when no search ran)
    pub depth: i32,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Nodes visited by the prover and the principal search
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn immediate_win(mv: Move) -> Self {
        Self {
            best_move: mv,
            score: WIN,
            search_type: SearchType::ImmediateWin,
            depth: 0,
            time_ms: 0,
            nodes: 1,
        }
    }

    #[inline]
    fn defense(mv: Move, level: u8) -> Self {
        Self {
            best_move: mv,
            score: -(level as i32) * RoadScore::THREAT,
            search_type: SearchType::Defense,
            depth: 0,
            time_ms: 0,
            nodes: 0,
        }
    }

    #[inline]
    fn forced_win(mv: Move, depth: i32, nodes: u64) -> Self {
        Self {
            best_move: mv,
            score: WIN - depth,
            search_type: SearchType::ForcedWin,
            depth,
            time_ms: 0,
            nodes,
        }
    }

    #[inline]
    fn principal(mv: Move, result: &SearchResult, nodes: u64) -> Self {
        Self {
            best_move: mv,
            score: result.score,
            search_type: SearchType::Principal,
            depth: result.depth as i32,
            time_ms: 0,
            nodes,
        }
    }

    #[inline]
    fn fallback(mv: Move, nodes: u64) -> Self {
        Self {
            best_move: mv,
            score: 0,
            search_type: SearchType::Fallback,
            depth: 0,
            time_ms: 0,
            nodes,
        }
    }
}

/// Connect6 engine playing one side of one game.
///
/// The opponent's moves are fed in through [`decide_move`](Engine::decide_move);
/// the engine never takes a position snapshot mid-game.
pub struct Engine {
    config: EngineConfig,
    position: Position,
    ctx: SearchContext,
    searcher: Searcher,
    prover: ForcedWinProver,
}

impl Engine {
    /// Engine with the default configuration at the initial position.
    #[must_use]
    pub fn new() -> Self {
        let config = EngineConfig::default();
        let position = Position::new();
        Self {
            ctx: SearchContext::new(config.tt_size_mb, &position),
            prover: ForcedWinProver::with_limits(config.dtss_max_points, config.dtss_max_moves),
            searcher: Searcher::new(),
            position,
            config,
        }
    }

    /// Engine with a validated configuration at the initial position.
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        Self::from_position(Position::new(), config)
    }

    /// Engine continuing from `position`, e.g. a composed problem.
    pub fn from_position(position: Position, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            ctx: SearchContext::new(config.tt_size_mb, &position),
            prover: ForcedWinProver::with_limits(config.dtss_max_points, config.dtss_max_moves),
            searcher: Searcher::new(),
            position,
            config,
        })
    }

    /// Start a new game: initial position, empty transposition table.
    pub fn reset(&mut self) {
        self.position.reset();
        self.ctx.reset(&self.position);
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tt_stats(&self) -> TTStats {
        self.ctx.tt_stats()
    }

    /// Apply the opponent's move (if any), choose a reply and apply it.
    pub fn decide_move(&mut self, opponent_move: Option<Move>) -> Result<Move, EngineError> {
        self.decide_move_with_stats(opponent_move)
            .map(|result| result.best_move)
    }

    /// Like [`decide_move`](Engine::decide_move), with search statistics.
    ///
    /// An illegal opponent move is rejected without changing any state.
    pub fn decide_move_with_stats(
        &mut self,
        opponent_move: Option<Move>,
    ) -> Result<MoveResult, EngineError> {
        let start = Instant::now();

        if self.position.is_game_over() {
            return Err(EngineError::GameOver);
        }
        if let Some(mv) = opponent_move {
            if !self.position.is_legal(mv) {
                return Err(EngineError::IllegalMove(mv));
            }
            self.ctx.make_move(&mut self.position, mv);
            if self.position.is_game_over() {
                return Err(EngineError::GameOver);
            }
        }
        if self.position.is_full() {
            return Err(EngineError::NoLegalMove);
        }

        let mut result = self.choose(start)?;
        result.time_ms = start.elapsed().as_millis() as u64;
        self.ctx.make_move(&mut self.position, result.best_move);

        log::info!(
            "{:?} plays {} ({:?}, score {}, depth {}, {} nodes, {} ms)",
            self.position.side_to_move().opponent(),
            result.best_move,
            result.search_type,
            result.score,
            result.depth,
            result.nodes,
            result.time_ms
        );
        Ok(result)
    }

    fn choose(&mut self, start: Instant) -> Result<MoveResult, EngineError> {
        let me = self.position.side_to_move();
        let opponent = me.opponent();

        // 1. Complete a six
        if let Some(mv) = find_immediate_win(&self.position, me) {
            return Ok(MoveResult::immediate_win(mv));
        }

        // 2. Forced defense
        let level = threat_level(&self.position, me);
        if level > 0 {
            let deadline = after(start, Duration::from_millis(self.config.block_budget_ms));
            let block = best_block(&mut self.position, deadline).or_else(|| self.block_win_spots());
            if let Some(mv) = block {
                log::debug!("threat level {} against {:?}, blocking with {}", level, me, mv);
                return Ok(MoveResult::defense(mv, level));
            }
        } else if !win_spots(&self.position, opponent).is_empty() {
            if let Some(mv) = self.block_win_spots() {
                return Ok(MoveResult::defense(mv, 1));
            }
        }

        // 3. Forced win
        let dtss_deadline = after(start, Duration::from_millis(self.config.dtss_budget_ms));
        let proof = self.prover.prove_iterative(
            &mut self.position,
            self.config.dtss_min_depth,
            self.config.dtss_max_depth,
            dtss_deadline,
        );
        let mut nodes = proof.nodes;
        if let Some(mv) = proof.first_move {
            log::debug!("forced win at depth {} ({} nodes)", proof.depth, proof.nodes);
            return Ok(MoveResult::forced_win(mv, proof.depth, nodes));
        }
        log::debug!(
            "no forced win up to depth {}{}",
            proof.depth,
            if proof.timed_out { " (timed out)" } else { "" }
        );

        // 4. Principal search, then the safety check
        let limit = self.config.time_limit();
        let reserve = Duration::from_millis(self.config.search_reserve_ms);
        let deadline = after(start, limit.saturating_sub(reserve));
        let soft_stop = deadline.checked_sub(reserve).unwrap_or(deadline);
        let result = self.searcher.search(
            &mut self.position,
            &mut self.ctx,
            self.config.search_min_depth,
            self.config.search_max_depth,
            soft_stop,
            deadline,
        );
        nodes += result.nodes;
        log::debug!(
            "pvs depth {} score {} ({} nodes, first-move cutoffs {:.1}%, tt hits {:.1}%)",
            result.depth,
            result.score,
            result.nodes,
            result.stats.first_move_rate(),
            result.stats.tt_score_rate()
        );

        if let Some(preferred) = result.best_move {
            let mv = if result.score >= 0 && is_mate_score(result.score) {
                preferred
            } else {
                self.safety_check(preferred, &result.root_moves, start)
            };
            return Ok(MoveResult::principal(mv, &result, nodes));
        }

        // 5. Anything legal
        any_legal_pair(&self.position)
            .map(|mv| MoveResult::fallback(mv, nodes))
            .ok_or(EngineError::NoLegalMove)
    }

    /// Block the opponent's best win spots directly, completing the pair
    /// with the positionally best cell when only one spot exists.
    fn block_win_spots(&self) -> Option<Move> {
        let me = self.position.side_to_move();
        let spots = win_spots(&self.position, me.opponent());
        let first = *spots.first()?;
        let second = match spots.get(1) {
            Some(&cell) => cell,
            None => best_cell(&self.position, Some(first), me)?,
        };
        Some(Move::new(first, second))
    }

    /// The first of `preferred` and the next-ranked root moves after which
    /// the opponent's prover finds no forced win. Probes that time out are
    /// inconclusive and skipped; if none is proven safe, `preferred` stands.
    fn safety_check(&mut self, preferred: Move, ranked: &[Move], start: Instant) -> Move {
        let limit = self.config.time_limit();
        let margin = Duration::from_millis(self.config.safety_margin_ms);
        let deadline = after(start, limit.saturating_sub(margin));
        let probe = Duration::from_millis(self.config.safety_probe_ms);

        let candidates = std::iter::once(preferred)
            .chain(ranked.iter().copied().filter(|&mv| mv != preferred))
            .take(self.config.safety_candidates);

        for mv in candidates {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            self.ctx.make_move(&mut self.position, mv);
            let reply = self.prover.prove(
                &mut self.position,
                self.config.safety_depth,
                after(now, probe).min(deadline),
            );
            self.ctx.undo_move(&mut self.position);

            if reply.timed_out {
                log::debug!("safety check of {} inconclusive", mv);
                continue;
            }
            if !reply.is_proven() {
                if mv != preferred {
                    log::debug!("safety check replaced {} with {}", preferred, mv);
                }
                return mv;
            }
            log::debug!("safety check: {} loses to a forced win", mv);
        }
        preferred
    }
}

/// `start + budget`, capped for budgets too large to represent.
fn after(start: Instant, budget: Duration) -> Instant {
    start
        .checked_add(budget)
        .unwrap_or_else(|| start + Duration::from_secs(365 * 24 * 3600))
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
