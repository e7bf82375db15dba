//! Search module for the Connect6 engine
//!
//! Contains:
//! - Zobrist hashing and the transposition table
//! - The per-game [`SearchContext`]
//! - The threat oracle and move generation
//! - The forced-win prover (double-threat space search)
//! - Principal variation search with iterative deepening

pub mod alphabeta;
pub mod context;
pub mod dtss;
pub mod movegen;
pub mod threat;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{is_mate_score, SearchResult, SearchStats, Searcher, INF, MATE_BOUND, WIN};
pub use context::SearchContext;
pub use dtss::{ForcedWinProver, ProofResult};
pub use threat::{
    blocking_cells, find_immediate_win, has_win_in_one, potential_cells, single_blocks,
    threat_level, win_spots, UNSTOPPABLE,
};
pub use tt::{EntryType, Probe, TTEntry, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;
