//! Reward pool records.

use gridpledge_types::params::{BPS_DENOMINATOR, MAX_SCORE};
use gridpledge_types::{Amount, Principal, Timestamp};
use serde::{Deserialize, Serialize};

/// Status of a pool. `Closed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolStatus {
    Active,
    Closed,
}

/// A time-locked reward pool.
///
/// `claimed` never exceeds `total_reward`. The spendable pool balance is kept
/// by the ledger next to the pool, not on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPool {
    /// Initial funding plus all deposits.
    pub total_reward: Amount,
    pub claimed: Amount,
    pub start_time: Timestamp,
    /// Claims and closing open at this time; deposits stop after it.
    pub end_time: Timestamp,
    pub lock_period: u64,
    pub reward_rate_bps: u32,
    pub status: PoolStatus,
    pub creator: Principal,
}

impl RewardPool {
    pub fn is_active(&self) -> bool {
        self.status == PoolStatus::Active
    }

    /// Deposits are accepted through `end_time` inclusive.
    pub fn accepts_deposits(&self, now: Timestamp) -> bool {
        now <= self.end_time
    }

    /// Claims and closing are allowed from `end_time` on.
    pub fn is_unlocked(&self, now: Timestamp) -> bool {
        now >= self.end_time
    }

    /// Reward left before `total_reward` is exhausted.
    pub fn unclaimed(&self) -> Amount {
        self.total_reward.saturating_sub(self.claimed)
    }

    /// `total_reward · score / 100 · rate / 10_000`, truncating at each step.
    pub fn scaled_reward(&self, score: u8) -> Option<Amount> {
        let base = self.total_reward.checked_mul(score as u128)? / MAX_SCORE as u128;
        Some(base.checked_mul(self.reward_rate_bps as u128)? / BPS_DENOMINATOR as u128)
    }
}
