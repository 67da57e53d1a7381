//! Collaborator traits and their implementations for the engine and ledger.

use gridpledge_crypto::SignatureOracle;
use gridpledge_pool::{PoolError, RewardLedger};
use gridpledge_store::BalanceStore;
use gridpledge_types::{Amount, EventId, PoolId, Principal, Timestamp};
use gridpledge_verification::VerificationEngine;
use std::fmt::Display;

/// Read access to event status and verification scores.
pub trait ScoreSource {
    /// `None` if the event does not exist, otherwise whether it has ended.
    fn event_ended(&self, event: EventId) -> Option<bool>;

    /// A participant's score. Unverified participants score 0.
    fn score(&self, event: EventId, user: &Principal) -> u8;
}

/// Pool balances and operator claims.
pub trait PoolFunds {
    type Error: Display;

    fn pool_balance(&self, pool: PoolId) -> Amount;

    /// Pay `amount` from `pool` to `beneficiary`, authorized as `operator`.
    fn claim_for(
        &mut self,
        operator: &Principal,
        pool: PoolId,
        beneficiary: &Principal,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), Self::Error>;
}

impl<O: SignatureOracle> ScoreSource for VerificationEngine<O> {
    fn event_ended(&self, event: EventId) -> Option<bool> {
        self.event(event).map(|e| !e.is_active())
    }

    fn score(&self, event: EventId, user: &Principal) -> u8 {
        self.get_score(event, user).unwrap_or(0)
    }
}

impl<S: BalanceStore> PoolFunds for RewardLedger<S> {
    type Error = PoolError;

    fn pool_balance(&self, pool: PoolId) -> Amount {
        RewardLedger::pool_balance(self, pool)
    }

    fn claim_for(
        &mut self,
        operator: &Principal,
        pool: PoolId,
        beneficiary: &Principal,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), PoolError> {
        self.claim_reward_for(operator, pool, beneficiary, amount, now)
    }
}
