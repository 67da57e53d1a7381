//! Account-balance storage for GridPledge.
//!
//! The pool ledger and the slashing path move funds only through the
//! [`BalanceStore`] trait. Persistence is an external concern; backends
//! implement the trait and the rest of the codebase depends only on it.

pub mod balance;
pub mod error;

pub use balance::{BalanceStore, MemoryBalanceStore};
pub use error::StoreError;
