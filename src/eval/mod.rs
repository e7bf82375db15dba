//! Position evaluation over the line index

pub mod heuristic;
pub mod patterns;

pub use heuristic::{best_cell, evaluate, road_score, spot_score};
pub use patterns::{RoadScore, ATTACK, DEFENSE, POW};
