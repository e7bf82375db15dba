//! Engine configuration: time budgets, depths and candidate caps
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```
//! use connect6::EngineConfig;
//!
//! let config: EngineConfig = serde_json::from_str(r#"{ "time_limit_ms": 2000 }"#).unwrap();
//! assert_eq!(config.time_limit_ms, 2000);
//! assert_eq!(config.dtss_max_depth, 27);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::search::context::MAX_PLY;

const DEFAULT_TIME_LIMIT_MS: u64 = 8_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whole-turn budget
    pub time_limit_ms: u64,
    /// Budget for choosing a forced-defence pair
    pub block_budget_ms: u64,
    /// Budget for the iterative forced-win prover
    pub dtss_budget_ms: u64,
    pub dtss_min_depth: i32,
    pub dtss_max_depth: i32,
    /// Attacker cells the prover pairs up
    pub dtss_max_points: usize,
    /// Attacker moves the prover keeps per node
    pub dtss_max_moves: usize,
    pub search_min_depth: i8,
    pub search_max_depth: i8,
    /// Time the principal search leaves for the safety check
    pub search_reserve_ms: u64,
    /// The safety check ends this long before the turn budget
    pub safety_margin_ms: u64,
    /// Opponent-prover deadline per safety candidate
    pub safety_probe_ms: u64,
    pub safety_candidates: usize,
    pub safety_depth: i32,
    pub tt_size_mb: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            block_budget_ms: 800,
            dtss_budget_ms: 5_500,
            dtss_min_depth: 3,
            dtss_max_depth: 27,
            dtss_max_points: 32,
            dtss_max_moves: 80,
            search_min_depth: 2,
            search_max_depth: 10,
            search_reserve_ms: 500,
            safety_margin_ms: 200,
            safety_probe_ms: 250,
            safety_candidates: 12,
            safety_depth: 7,
            tt_size_mb: 64,
        }
    }
}

impl EngineConfig {
    /// Defaults with every time budget scaled to a `time_limit_ms` turn.
    pub fn with_time_limit(time_limit_ms: u64) -> Self {
        let base = Self::default();
        // Every default budget is below the default limit, so the result fits
        let scale = |ms: u64| {
            (ms as u128 * time_limit_ms as u128 / DEFAULT_TIME_LIMIT_MS as u128) as u64
        };
        Self {
            time_limit_ms,
            block_budget_ms: scale(base.block_budget_ms),
            dtss_budget_ms: scale(base.dtss_budget_ms),
            search_reserve_ms: scale(base.search_reserve_ms),
            safety_margin_ms: scale(base.safety_margin_ms),
            safety_probe_ms: scale(base.safety_probe_ms),
            ..base
        }
    }

    /// Load a JSON config file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject budgets and depths the engine cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.time_limit_ms == 0 {
            return invalid("time_limit_ms must be positive".into());
        }
        if self.dtss_budget_ms > self.time_limit_ms {
            return invalid(format!(
                "dtss_budget_ms ({}) exceeds time_limit_ms ({})",
                self.dtss_budget_ms, self.time_limit_ms
            ));
        }
        if self.block_budget_ms > self.time_limit_ms {
            return invalid(format!(
                "block_budget_ms ({}) exceeds time_limit_ms ({})",
                self.block_budget_ms, self.time_limit_ms
            ));
        }
        if self.search_reserve_ms.saturating_mul(2) > self.time_limit_ms {
            return invalid("search_reserve_ms must be at most half of time_limit_ms".into());
        }
        if self.safety_margin_ms > self.search_reserve_ms {
            return invalid("safety_margin_ms must not exceed search_reserve_ms".into());
        }
        if self.dtss_min_depth < 1 || self.dtss_min_depth > self.dtss_max_depth {
            return invalid(format!(
                "dtss depths {}..{} are empty or start below 1",
                self.dtss_min_depth, self.dtss_max_depth
            ));
        }
        if self.search_min_depth < 1
            || self.search_min_depth > self.search_max_depth
            || self.search_max_depth as usize >= MAX_PLY
        {
            return invalid(format!(
                "search depths {}..{} must lie within 1..{}",
                self.search_min_depth,
                self.search_max_depth,
                MAX_PLY - 1
            ));
        }
        if self.dtss_max_points < 2 || self.dtss_max_moves == 0 {
            return invalid("dtss candidate caps are too small".into());
        }
        if self.tt_size_mb == 0 {
            return invalid("tt_size_mb must be positive".into());
        }
        Ok(())
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}
