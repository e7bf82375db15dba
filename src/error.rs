//! Error types for the engine's outer surface
//!
//! The search itself never fails: timeouts and empty candidate lists are
//! ordinary values. Errors only arise from what callers hand in.

use thiserror::Error;

use crate::board::Move;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The opponent's move names an occupied or off-board cell, or one
    /// cell twice
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    #[error("game already over")]
    GameOver,
    #[error("no legal move left on the board")]
    NoLegalMove,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
