//! The reward ledger: token supply, transfers, and reward pools.

use std::collections::{HashMap, HashSet};

use crate::error::PoolError;
use crate::pool::{PoolStatus, RewardPool};
use crate::records::{TransferRecord, UserClaim};
use gridpledge_store::{BalanceStore, MemoryBalanceStore, StoreError};
use gridpledge_types::params::BPS_DENOMINATOR;
use gridpledge_types::{Amount, LedgerParams, PoolId, Principal, Timestamp};

/// Token balances plus the pools funded from them.
///
/// Pool funds are held by the treasury account. The admin mints, burns, and
/// creates pools; registered operators may claim on behalf of a beneficiary.
pub struct RewardLedger<S = MemoryBalanceStore> {
    admin: Principal,
    treasury: Principal,
    operators: HashSet<Principal>,
    params: LedgerParams,
    balances: S,
    transfers: Vec<TransferRecord>,
    next_pool_id: u64,
    total_pools: u64,
    pools: HashMap<PoolId, RewardPool>,
    pool_balances: HashMap<PoolId, Amount>,
    claims: HashMap<(PoolId, Principal), UserClaim>,
}

impl RewardLedger<MemoryBalanceStore> {
    /// A ledger with default parameters over an empty in-memory store.
    pub fn new(admin: Principal, treasury: Principal) -> Self {
        Self::with_store(admin, treasury, LedgerParams::default(), MemoryBalanceStore::new())
    }
}

impl<S: BalanceStore> RewardLedger<S> {
    pub fn with_store(admin: Principal, treasury: Principal, params: LedgerParams, balances: S) -> Self {
        Self {
            admin,
            treasury,
            operators: HashSet::new(),
            params,
            balances,
            transfers: Vec::new(),
            next_pool_id: 0,
            total_pools: 0,
            pools: HashMap::new(),
            pool_balances: HashMap::new(),
            claims: HashMap::new(),
        }
    }

    fn ensure_admin(&self, caller: &Principal) -> Result<(), PoolError> {
        if *caller != self.admin {
            tracing::warn!(caller = %caller, "rejected admin-only ledger call");
            return Err(PoolError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    fn ensure_recipient(recipient: &Principal) -> Result<(), PoolError> {
        if recipient.is_null() {
            return Err(PoolError::InvalidRecipient(recipient.clone()));
        }
        Ok(())
    }

    /// Move funds between accounts and log the movement.
    fn move_funds(&mut self, from: &Principal, to: &Principal, amount: Amount) -> Result<(), StoreError> {
        self.balances.transfer(from, to, amount)?;
        self.transfers.push(TransferRecord {
            amount,
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    /// Pool funds sit in the treasury account, so the treasury can neither
    /// fund a pool nor claim from one.
    fn ensure_not_treasury(&self, who: &Principal) -> Result<(), PoolError> {
        if *who == self.treasury {
            return Err(PoolError::TreasuryAccount(who.clone()));
        }
        Ok(())
    }

    // ── Token supply ───────────────────────────────────────────────────

    /// Create `amount` new tokens in `recipient`'s account.
    pub fn mint(&mut self, caller: &Principal, amount: Amount, recipient: &Principal) -> Result<(), PoolError> {
        self.ensure_admin(caller)?;
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        Self::ensure_recipient(recipient)?;
        self.balances.credit(recipient, amount)?;
        tracing::info!(amount, recipient = %recipient, "minted");
        Ok(())
    }

    /// Destroy `amount` tokens held by the treasury.
    pub fn burn(&mut self, caller: &Principal, amount: Amount) -> Result<(), PoolError> {
        self.ensure_admin(caller)?;
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        self.balances.debit(&self.treasury, amount)?;
        tracing::info!(amount, "burned from treasury");
        Ok(())
    }

    /// Move tokens from `sender` to `recipient`. Only the sender may call.
    pub fn transfer(
        &mut self,
        caller: &Principal,
        amount: Amount,
        sender: &Principal,
        recipient: &Principal,
    ) -> Result<(), PoolError> {
        if caller != sender {
            return Err(PoolError::Unauthorized(caller.clone()));
        }
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        Self::ensure_recipient(recipient)?;
        Ok(self.move_funds(sender, recipient, amount)?)
    }

    // ── Pools ──────────────────────────────────────────────────────────

    /// Mint `total_reward` into the treasury and open a pool unlocking after
    /// `lock_period`. Returns the new pool id; the first pool is 0.
    pub fn create_reward_pool(
        &mut self,
        caller: &Principal,
        total_reward: Amount,
        lock_period: u64,
        reward_rate_bps: u32,
        now: Timestamp,
    ) -> Result<PoolId, PoolError> {
        self.ensure_admin(caller)?;
        if self.total_pools >= self.params.max_pools {
            return Err(PoolError::PoolLimitReached {
                max: self.params.max_pools,
            });
        }
        if total_reward == 0 {
            return Err(PoolError::InvalidAmount);
        }
        if lock_period > self.params.max_lock_period {
            return Err(PoolError::InvalidLockPeriod {
                got: lock_period,
                max: self.params.max_lock_period,
            });
        }
        let max_rate = self.params.max_reward_rate_bps.min(BPS_DENOMINATOR);
        if reward_rate_bps > max_rate {
            return Err(PoolError::InvalidRewardRate {
                got: reward_rate_bps,
                max: max_rate,
            });
        }
        let next_pool_id = self.next_pool_id.checked_add(1).ok_or(PoolError::Overflow)?;

        self.balances.credit(&self.treasury, total_reward)?;
        let id = PoolId::new(self.next_pool_id);
        self.pools.insert(
            id,
            RewardPool {
                total_reward,
                claimed: 0,
                start_time: now,
                end_time: now.saturating_add(lock_period),
                lock_period,
                reward_rate_bps,
                status: PoolStatus::Active,
                creator: caller.clone(),
            },
        );
        self.pool_balances.insert(id, total_reward);
        self.next_pool_id = next_pool_id;
        self.total_pools += 1;
        tracing::info!(pool = %id, total_reward, lock_period, "reward pool created");
        Ok(id)
    }

    /// Top up an active pool from the caller's balance.
    pub fn deposit_to_pool(
        &mut self,
        caller: &Principal,
        pool_id: PoolId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), PoolError> {
        let pool = self.pools.get(&pool_id).ok_or(PoolError::PoolNotFound(pool_id))?;
        if !pool.is_active() {
            return Err(PoolError::PoolNotActive(pool_id));
        }
        if !pool.accepts_deposits(now) {
            return Err(PoolError::PoolExpired(pool_id));
        }
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        self.ensure_not_treasury(caller)?;
        let new_total = pool.total_reward.checked_add(amount).ok_or(PoolError::Overflow)?;
        let new_balance = self
            .pool_balance(pool_id)
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;

        let treasury = self.treasury.clone();
        self.move_funds(caller, &treasury, amount)?;
        if let Some(pool) = self.pools.get_mut(&pool_id) {
            pool.total_reward = new_total;
        }
        self.pool_balances.insert(pool_id, new_balance);
        tracing::debug!(pool = %pool_id, from = %caller, amount, "pool deposit");
        Ok(())
    }

    /// Claim `amount` from an unlocked pool for the caller.
    pub fn claim_reward(
        &mut self,
        caller: &Principal,
        pool_id: PoolId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), PoolError> {
        self.claim(pool_id, caller, amount, now)
    }

    /// Claim on behalf of `beneficiary`. Only registered operators may call.
    pub fn claim_reward_for(
        &mut self,
        operator: &Principal,
        pool_id: PoolId,
        beneficiary: &Principal,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), PoolError> {
        if !self.operators.contains(operator) {
            tracing::warn!(caller = %operator, "rejected claim from non-operator");
            return Err(PoolError::Unauthorized(operator.clone()));
        }
        Self::ensure_recipient(beneficiary)?;
        self.claim(pool_id, beneficiary, amount, now)
    }

    fn claim(
        &mut self,
        pool_id: PoolId,
        claimant: &Principal,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), PoolError> {
        let pool = self.pools.get(&pool_id).ok_or(PoolError::PoolNotFound(pool_id))?;
        if !pool.is_active() {
            return Err(PoolError::PoolNotActive(pool_id));
        }
        if !pool.is_unlocked(now) {
            return Err(PoolError::ClaimTooEarly {
                pool: pool_id,
                end: pool.end_time,
            });
        }
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        self.ensure_not_treasury(claimant)?;
        let key = (pool_id, claimant.clone());
        if self.claims.contains_key(&key) {
            return Err(PoolError::AlreadyClaimed {
                pool: pool_id,
                user: claimant.clone(),
            });
        }
        let available = self.pool_balance(pool_id);
        if available < amount {
            return Err(PoolError::InsufficientPoolBalance {
                pool: pool_id,
                needed: amount,
                available,
            });
        }
        if pool.unclaimed() < amount {
            return Err(PoolError::RewardExhausted(pool_id));
        }

        let treasury = self.treasury.clone();
        self.move_funds(&treasury, claimant, amount)?;
        self.claims.insert(
            key,
            UserClaim {
                amount,
                timestamp: now,
            },
        );
        if let Some(pool) = self.pools.get_mut(&pool_id) {
            pool.claimed += amount;
        }
        self.pool_balances.insert(pool_id, available - amount);
        tracing::info!(pool = %pool_id, claimant = %claimant, amount, "reward claimed");
        Ok(())
    }

    /// Close an unlocked pool and return its remaining balance to the creator.
    /// Returns the swept amount.
    pub fn close_pool(&mut self, caller: &Principal, pool_id: PoolId, now: Timestamp) -> Result<Amount, PoolError> {
        let pool = self.pools.get(&pool_id).ok_or(PoolError::PoolNotFound(pool_id))?;
        if *caller != pool.creator {
            return Err(PoolError::Unauthorized(caller.clone()));
        }
        if !pool.is_active() {
            return Err(PoolError::PoolNotActive(pool_id));
        }
        if !pool.is_unlocked(now) {
            return Err(PoolError::ClaimTooEarly {
                pool: pool_id,
                end: pool.end_time,
            });
        }
        let creator = pool.creator.clone();
        let remaining = self.pool_balance(pool_id);
        if remaining > 0 {
            let treasury = self.treasury.clone();
            self.move_funds(&treasury, &creator, remaining)?;
        }
        if let Some(pool) = self.pools.get_mut(&pool_id) {
            pool.status = PoolStatus::Closed;
        }
        self.pool_balances.insert(pool_id, 0);
        tracing::info!(pool = %pool_id, swept = remaining, "pool closed");
        Ok(remaining)
    }

    /// What `user` could claim for `score`, scaled by the pool's reward rate.
    pub fn get_claimable_reward(&self, pool_id: PoolId, user: &Principal, score: u8) -> Result<Amount, PoolError> {
        let pool = self.pools.get(&pool_id).ok_or(PoolError::PoolNotFound(pool_id))?;
        if !pool.is_active() {
            return Err(PoolError::PoolNotActive(pool_id));
        }
        if self.claims.contains_key(&(pool_id, user.clone())) {
            return Err(PoolError::AlreadyClaimed {
                pool: pool_id,
                user: user.clone(),
            });
        }
        pool.scaled_reward(score).ok_or(PoolError::Overflow)
    }

    // ── Administration ─────────────────────────────────────────────────

    pub fn set_admin(&mut self, caller: &Principal, new_admin: Principal) -> Result<(), PoolError> {
        self.ensure_admin(caller)?;
        Self::ensure_recipient(&new_admin)?;
        tracing::info!(from = %self.admin, to = %new_admin, "ledger admin changed");
        self.admin = new_admin;
        Ok(())
    }

    /// Allow `operator` to claim on behalf of others.
    pub fn add_operator(&mut self, caller: &Principal, operator: Principal) -> Result<(), PoolError> {
        self.ensure_admin(caller)?;
        Self::ensure_recipient(&operator)?;
        tracing::info!(operator = %operator, "operator added");
        self.operators.insert(operator);
        Ok(())
    }

    /// Returns whether the operator was registered.
    pub fn remove_operator(&mut self, caller: &Principal, operator: &Principal) -> Result<bool, PoolError> {
        self.ensure_admin(caller)?;
        Ok(self.operators.remove(operator))
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn balance_of(&self, who: &Principal) -> Amount {
        self.balances.balance(who)
    }

    pub fn pool(&self, id: PoolId) -> Option<&RewardPool> {
        self.pools.get(&id)
    }

    /// Spendable balance of a pool; unknown pools hold zero.
    pub fn pool_balance(&self, id: PoolId) -> Amount {
        self.pool_balances.get(&id).copied().unwrap_or(0)
    }

    pub fn user_claim(&self, pool: PoolId, user: &Principal) -> Option<&UserClaim> {
        self.claims.get(&(pool, user.clone()))
    }

    pub fn next_pool_id(&self) -> PoolId {
        PoolId::new(self.next_pool_id)
    }

    pub fn total_pools(&self) -> u64 {
        self.total_pools
    }

    /// Every logged balance movement, oldest first.
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    pub fn admin(&self) -> &Principal {
        &self.admin
    }

    pub fn treasury(&self) -> &Principal {
        &self.treasury
    }

    pub fn is_operator(&self, who: &Principal) -> bool {
        self.operators.contains(who)
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub fn store(&self) -> &S {
        &self.balances
    }
}

/// Other components move funds through the ledger so that every transfer
/// lands in [`RewardLedger::transfers`].
impl<S: BalanceStore> BalanceStore for RewardLedger<S> {
    fn balance(&self, who: &Principal) -> Amount {
        self.balances.balance(who)
    }

    fn credit(&mut self, who: &Principal, amount: Amount) -> Result<(), StoreError> {
        self.balances.credit(who, amount)
    }

    fn debit(&mut self, who: &Principal, amount: Amount) -> Result<(), StoreError> {
        self.balances.debit(who, amount)
    }

    fn transfer(&mut self, from: &Principal, to: &Principal, amount: Amount) -> Result<(), StoreError> {
        self.move_funds(from, to, amount)
    }
}
