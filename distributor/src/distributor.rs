//! The reward distributor.

use std::collections::{HashMap, HashSet};

use crate::error::DistributorError;
use crate::sources::{PoolFunds, ScoreSource};
use gridpledge_types::params::MAX_BATCH_LIMIT;
use gridpledge_types::{Amount, DistributorParams, EventId, PoolId, Principal, Timestamp};
use serde::{Deserialize, Serialize};

/// One participant's share of a distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub user: Principal,
    pub amount: Amount,
}

/// What a distribution actually paid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub event: EventId,
    pub pool: PoolId,
    /// Pool balance at the start of the distribution.
    pub snapshot: Amount,
    /// Participants whose claim succeeded.
    pub recipients: Vec<Payout>,
    /// Planned payouts whose claim failed.
    pub skipped: usize,
    pub total_distributed: Amount,
}

/// A validated distribution, before any claim is made.
struct Plan {
    pool: PoolId,
    snapshot: Amount,
    payouts: Vec<Payout>,
}

/// Splits a linked pool among an event's participants by score.
///
/// The distributor presents `operator` to the pool ledger when claiming on a
/// participant's behalf; that principal must be registered there.
pub struct RewardDistributor {
    admin: Principal,
    operator: Principal,
    params: DistributorParams,
    event_pools: HashMap<EventId, PoolId>,
    distributed: HashSet<EventId>,
    user_rewards: HashMap<(EventId, Principal), Amount>,
}

impl RewardDistributor {
    pub fn new(admin: Principal, operator: Principal) -> Self {
        Self::build(admin, operator, DistributorParams::default())
    }

    /// Fails if `params.batch_limit` exceeds [`MAX_BATCH_LIMIT`].
    pub fn with_params(
        admin: Principal,
        operator: Principal,
        params: DistributorParams,
    ) -> Result<Self, DistributorError> {
        if params.batch_limit > MAX_BATCH_LIMIT {
            return Err(DistributorError::BatchLimitExceeded {
                len: params.batch_limit,
                limit: MAX_BATCH_LIMIT,
            });
        }
        Ok(Self::build(admin, operator, params))
    }

    fn build(admin: Principal, operator: Principal, params: DistributorParams) -> Self {
        Self {
            admin,
            operator,
            params,
            event_pools: HashMap::new(),
            distributed: HashSet::new(),
            user_rewards: HashMap::new(),
        }
    }

    fn ensure_admin(&self, caller: &Principal) -> Result<(), DistributorError> {
        if *caller != self.admin {
            tracing::warn!(caller = %caller, "rejected admin-only distributor call");
            return Err(DistributorError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    /// Bind an event to the pool that funds it. A link is permanent.
    pub fn link_event_to_pool(
        &mut self,
        caller: &Principal,
        event: EventId,
        pool: PoolId,
    ) -> Result<(), DistributorError> {
        self.ensure_admin(caller)?;
        if !event.is_valid() {
            return Err(DistributorError::InvalidEventId(event));
        }
        if let Some(&existing) = self.event_pools.get(&event) {
            return Err(DistributorError::AlreadyLinked {
                event,
                pool: existing,
            });
        }
        self.event_pools.insert(event, pool);
        tracing::info!(event = %event, pool = %pool, "event linked to pool");
        Ok(())
    }

    /// Validate a batch and compute each participant's share.
    ///
    /// `share = floor(snapshot · score / total_score)`, where `total_score`
    /// sums every listed entry. Participants scoring zero, already rewarded,
    /// listed twice, or whose share rounds to zero get no payout.
    fn plan<S, F>(&self, event: EventId, users: &[Principal], scores: &S, funds: &F) -> Result<Plan, DistributorError>
    where
        S: ScoreSource + ?Sized,
        F: PoolFunds + ?Sized,
    {
        if !event.is_valid() {
            return Err(DistributorError::InvalidEventId(event));
        }
        if users.len() > self.params.batch_limit {
            return Err(DistributorError::BatchLimitExceeded {
                len: users.len(),
                limit: self.params.batch_limit,
            });
        }
        if self.distributed.contains(&event) {
            return Err(DistributorError::AlreadyDistributed(event));
        }
        if scores.event_ended(event) != Some(true) {
            return Err(DistributorError::EventNotEnded(event));
        }
        let pool = *self
            .event_pools
            .get(&event)
            .ok_or(DistributorError::PoolNotLinked(event))?;

        let user_scores: Vec<u128> = users.iter().map(|u| scores.score(event, u) as u128).collect();
        let total_score: u128 = user_scores.iter().sum();
        if total_score == 0 {
            return Err(DistributorError::ZeroTotalScore);
        }
        let snapshot = funds.pool_balance(pool);
        if snapshot < 1 {
            return Err(DistributorError::EmptyPool {
                pool,
                balance: snapshot,
            });
        }

        let mut seen = HashSet::new();
        let mut payouts = Vec::new();
        for (user, &score) in users.iter().zip(&user_scores) {
            if score == 0 || !seen.insert(user) {
                continue;
            }
            if self.user_rewards.contains_key(&(event, user.clone())) {
                continue;
            }
            let amount = snapshot.checked_mul(score).ok_or(DistributorError::Overflow)? / total_score;
            if amount > 0 {
                payouts.push(Payout {
                    user: user.clone(),
                    amount,
                });
            }
        }
        Ok(Plan {
            pool,
            snapshot,
            payouts,
        })
    }

    /// Pay every listed participant their score-proportional share of the
    /// event's pool, then latch the event as distributed.
    ///
    /// A failed claim skips that participant. The latch is set even when
    /// nobody was paid.
    pub fn distribute_rewards<S, F>(
        &mut self,
        caller: &Principal,
        event: EventId,
        users: &[Principal],
        scores: &S,
        funds: &mut F,
        now: Timestamp,
    ) -> Result<DistributionReport, DistributorError>
    where
        S: ScoreSource + ?Sized,
        F: PoolFunds + ?Sized,
    {
        self.ensure_admin(caller)?;
        let plan = self.plan(event, users, scores, funds)?;

        let mut report = DistributionReport {
            event,
            pool: plan.pool,
            snapshot: plan.snapshot,
            recipients: Vec::with_capacity(plan.payouts.len()),
            skipped: 0,
            total_distributed: 0,
        };
        for payout in plan.payouts {
            match funds.claim_for(&self.operator, plan.pool, &payout.user, payout.amount, now) {
                Ok(()) => {
                    self.user_rewards.insert((event, payout.user.clone()), payout.amount);
                    report.total_distributed += payout.amount;
                    report.recipients.push(payout);
                }
                Err(e) => {
                    tracing::debug!(event = %event, user = %payout.user, error = %e, "skip payout");
                    report.skipped += 1;
                }
            }
        }
        self.distributed.insert(event);
        tracing::info!(
            event = %event,
            pool = %plan.pool,
            recipients = report.recipients.len(),
            skipped = report.skipped,
            total = report.total_distributed,
            "rewards distributed"
        );
        Ok(report)
    }

    /// The payouts `distribute_rewards` would attempt for this batch.
    pub fn preview_distribution<S, F>(
        &self,
        event: EventId,
        users: &[Principal],
        scores: &S,
        funds: &F,
    ) -> Result<Vec<Payout>, DistributorError>
    where
        S: ScoreSource + ?Sized,
        F: PoolFunds + ?Sized,
    {
        self.plan(event, users, scores, funds).map(|p| p.payouts)
    }

    /// Single-user reward estimate.
    ///
    /// The ratio is the user's score over itself, so any positive score
    /// yields the whole pool balance. Use [`Self::preview_distribution`] for
    /// batch-aware amounts.
    pub fn get_pending_reward<S, F>(
        &self,
        event: EventId,
        user: &Principal,
        scores: &S,
        funds: &F,
    ) -> Result<Amount, DistributorError>
    where
        S: ScoreSource + ?Sized,
        F: PoolFunds + ?Sized,
    {
        if !event.is_valid() {
            return Err(DistributorError::InvalidEventId(event));
        }
        if user.is_null() {
            return Err(DistributorError::InvalidUser(user.clone()));
        }
        let pool = *self
            .event_pools
            .get(&event)
            .ok_or(DistributorError::PoolNotLinked(event))?;
        let score = scores.score(event, user) as u128;
        let total_score = scores.score(event, user) as u128;
        if score == 0 || total_score == 0 {
            return Ok(0);
        }
        let balance = funds.pool_balance(pool);
        Ok(balance.checked_mul(score).ok_or(DistributorError::Overflow)? / total_score)
    }

    // ── Administration ─────────────────────────────────────────────────

    pub fn set_admin(&mut self, caller: &Principal, new_admin: Principal) -> Result<(), DistributorError> {
        self.ensure_admin(caller)?;
        if new_admin.is_null() {
            return Err(DistributorError::InvalidUser(new_admin));
        }
        tracing::info!(from = %self.admin, to = %new_admin, "distributor admin changed");
        self.admin = new_admin;
        Ok(())
    }

    /// Change the principal presented to the ledger for claims.
    pub fn set_operator(&mut self, caller: &Principal, operator: Principal) -> Result<(), DistributorError> {
        self.ensure_admin(caller)?;
        if operator.is_null() {
            return Err(DistributorError::InvalidUser(operator));
        }
        self.operator = operator;
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn event_pool(&self, event: EventId) -> Option<PoolId> {
        self.event_pools.get(&event).copied()
    }

    pub fn is_distributed(&self, event: EventId) -> bool {
        self.distributed.contains(&event)
    }

    /// Amount paid to `user` for `event`; zero if nothing was paid.
    pub fn user_reward(&self, event: EventId, user: &Principal) -> Amount {
        self.user_rewards
            .get(&(event, user.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn admin(&self) -> &Principal {
        &self.admin
    }

    pub fn operator(&self) -> &Principal {
        &self.operator
    }

    pub fn params(&self) -> &DistributorParams {
        &self.params
    }
}
