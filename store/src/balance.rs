//! Balance store trait and the in-memory backend.

use crate::StoreError;
use gridpledge_types::{Amount, Principal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-principal token balances.
///
/// `debit` and `credit` are each atomic; `transfer` checks both sides before
/// touching either, so a failed transfer leaves both balances unchanged.
pub trait BalanceStore {
    /// Current balance; unknown principals hold zero.
    fn balance(&self, who: &Principal) -> Amount;

    fn credit(&mut self, who: &Principal, amount: Amount) -> Result<(), StoreError>;

    fn debit(&mut self, who: &Principal, amount: Amount) -> Result<(), StoreError>;

    /// Move `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), StoreError> {
        let available = self.balance(from);
        if available < amount {
            return Err(StoreError::InsufficientBalance {
                account: from.to_string(),
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        self.balance(to)
            .checked_add(amount)
            .ok_or_else(|| StoreError::Overflow(to.to_string()))?;
        self.debit(from, amount)?;
        self.credit(to, amount)
    }
}

/// A `HashMap`-backed balance store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryBalanceStore {
    balances: HashMap<Principal, Amount>,
}

impl MemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all balances. Used for conservation checks.
    pub fn total_supply(&self) -> Amount {
        self.balances.values().sum()
    }
}

impl BalanceStore for MemoryBalanceStore {
    fn balance(&self, who: &Principal) -> Amount {
        self.balances.get(who).copied().unwrap_or(0)
    }

    fn credit(&mut self, who: &Principal, amount: Amount) -> Result<(), StoreError> {
        let entry = self.balances.entry(who.clone()).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| StoreError::Overflow(who.to_string()))?;
        Ok(())
    }

    fn debit(&mut self, who: &Principal, amount: Amount) -> Result<(), StoreError> {
        let available = self.balance(who);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| StoreError::InsufficientBalance {
                account: who.to_string(),
                needed: amount,
                available,
            })?;
        self.balances.insert(who.clone(), remaining);
        Ok(())
    }
}
