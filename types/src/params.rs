//! Tunable parameters for the verification engine, pool ledger, and distributor.
//!
//! Every struct deserializes with per-field defaults so a config file only has
//! to mention the values it overrides.

use serde::{Deserialize, Serialize};

/// Highest possible verification score.
pub const MAX_SCORE: u8 = 100;

/// Denominator for basis-point rates (10_000 bps = 100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Upper bound on users per slashing or distribution batch.
pub const MAX_BATCH_LIMIT: usize = 200;

/// Width in bytes of an oracle reading signature.
pub const SIGNATURE_LEN: usize = 65;

/// Verification engine parameters. All are oracle-tunable at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Scores strictly below this are slashed. At most [`MAX_SCORE`].
    #[serde(default = "default_min_score")]
    pub min_score: u8,

    /// Penalty rate in percent. At most 100.
    #[serde(default = "default_penalty_rate")]
    pub penalty_rate: u8,

    /// Reward multiplier in percent applied to a score. Never zero.
    #[serde(default = "default_reward_multiplier")]
    pub reward_multiplier: u32,

    /// Maximum users per slashing batch, at most [`MAX_BATCH_LIMIT`].
    /// Can only be lowered at runtime.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
}

/// Pool ledger parameters, fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Maximum number of pools ever created.
    #[serde(default = "default_max_pools")]
    pub max_pools: u64,

    /// Longest accepted lock period, in clock seconds.
    #[serde(default = "default_max_lock_period")]
    pub max_lock_period: u64,

    /// Highest accepted reward rate in basis points.
    #[serde(default = "default_max_reward_rate_bps")]
    pub max_reward_rate_bps: u32,
}

/// Reward distributor parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributorParams {
    /// Maximum users per distribution batch, at most [`MAX_BATCH_LIMIT`].
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_min_score() -> u8 {
    50
}

fn default_penalty_rate() -> u8 {
    20
}

fn default_reward_multiplier() -> u32 {
    150
}

fn default_batch_limit() -> usize {
    MAX_BATCH_LIMIT
}

fn default_max_pools() -> u64 {
    100
}

fn default_max_lock_period() -> u64 {
    525_600
}

fn default_max_reward_rate_bps() -> u32 {
    BPS_DENOMINATOR
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            penalty_rate: default_penalty_rate(),
            reward_multiplier: default_reward_multiplier(),
            batch_limit: default_batch_limit(),
        }
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            max_pools: default_max_pools(),
            max_lock_period: default_max_lock_period(),
            max_reward_rate_bps: default_max_reward_rate_bps(),
        }
    }
}

impl Default for DistributorParams {
    fn default() -> Self {
        Self {
            batch_limit: default_batch_limit(),
        }
    }
}
