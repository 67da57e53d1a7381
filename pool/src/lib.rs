//! Reward token and pool ledger.
//!
//! The ledger owns token balances (through a [`gridpledge_store::BalanceStore`])
//! and time-locked reward pools. Pool funds sit in the treasury account; each
//! pool tracks its spendable share separately as its pool balance.
//!
//! A pool lives through:
//! - **Creation**: the admin mints the total reward into the treasury and opens the pool.
//! - **Deposits**: anyone may top up an active pool until its end time.
//! - **Claims**: after the end time each principal may claim once.
//! - **Close**: the creator closes the pool and receives whatever was not claimed.

pub mod error;
pub mod ledger;
pub mod pool;
pub mod records;

pub use error::PoolError;
pub use ledger::RewardLedger;
pub use pool::{PoolStatus, RewardPool};
pub use records::{TransferRecord, UserClaim};
