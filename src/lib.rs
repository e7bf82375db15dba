//! Connect6 tactical engine
//!
//! Connect6 is played on a 19x19 board. Black's first stone sits on the
//! center; from then on White and Black alternate placing two stones per
//! turn. Six or more in a row wins.
//!
//! # Architecture
//!
//! - [`board`]: cells, moves, and the line index (every 6-cell road with
//!   its stone counts, updated incrementally)
//! - [`rules`]: literal board scans for six-in-a-row
//! - [`eval`]: road-count score tables and evaluation
//! - [`search`]: threat oracle, move generation, forced-win prover,
//!   principal variation search, hashing and transposition table
//! - [`engine`]: the per-turn decision pipeline
//! - [`config`], [`error`]: budgets and error types
//!
//! # Quick Start
//!
//! ```
//! use connect6::{Engine, EngineConfig, Stone};
//!
//! let mut engine = Engine::with_config(EngineConfig::with_time_limit(500)).unwrap();
//!
//! // The engine plays White's opening reply to the center stone
//! let mv = engine.decide_move(None).unwrap();
//! assert_eq!(engine.position().get(mv.first()), Stone::White);
//! ```
//!
//! # Decision Priority
//!
//! 1. Immediate win
//! 2. Block the opponent's immediate win
//! 3. Forced win found by double-threat space search
//! 4. Principal variation search, checked against the opponent's forced wins

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Move, Pos, Position, Stone, BOARD_SIZE};
pub use config::EngineConfig;
pub use engine::{Engine, MoveResult, SearchType};
pub use error::{ConfigError, EngineError};
