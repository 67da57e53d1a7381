//! Pool-ledger errors.

use gridpledge_store::StoreError;
use gridpledge_types::{Amount, ErrorKind, PoolId, Principal, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("{0} is not authorized for this operation")]
    Unauthorized(Principal),

    #[error("{0} holds pool funds and cannot deposit or claim")]
    TreasuryAccount(Principal),

    #[error("amount must be non-zero")]
    InvalidAmount,

    #[error("{0} is not a valid recipient")]
    InvalidRecipient(Principal),

    #[error("pool limit of {max} reached")]
    PoolLimitReached { max: u64 },

    #[error("lock period {got} exceeds maximum {max}")]
    InvalidLockPeriod { got: u64, max: u64 },

    #[error("reward rate {got} bps exceeds maximum {max}")]
    InvalidRewardRate { got: u32, max: u32 },

    #[error("{0} not found")]
    PoolNotFound(PoolId),

    #[error("{0} is closed")]
    PoolNotActive(PoolId),

    #[error("{0} no longer accepts deposits")]
    PoolExpired(PoolId),

    #[error("{pool} cannot be claimed or closed before {end}")]
    ClaimTooEarly { pool: PoolId, end: Timestamp },

    #[error("{user} has already claimed from {pool}")]
    AlreadyClaimed { pool: PoolId, user: Principal },

    #[error("{pool} holds {available}, need {needed}")]
    InsufficientPoolBalance {
        pool: PoolId,
        needed: Amount,
        available: Amount,
    },

    #[error("claim would exceed the total reward of {0}")]
    RewardExhausted(PoolId),

    #[error("arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PoolError {
    pub fn kind(&self) -> ErrorKind {
        use PoolError::*;
        match self {
            Unauthorized(_) | TreasuryAccount(_) => ErrorKind::Unauthorized,
            InvalidRecipient(_) => ErrorKind::InvalidIdentifier,
            InvalidAmount | InvalidLockPeriod { .. } | InvalidRewardRate { .. } | Overflow => {
                ErrorKind::InvalidAmount
            }
            PoolNotFound(_) => ErrorKind::NotFound,
            PoolLimitReached { .. } | PoolNotActive(_) | PoolExpired(_) | ClaimTooEarly { .. } => {
                ErrorKind::NotEligible
            }
            AlreadyClaimed { .. } => ErrorKind::AlreadyDone,
            InsufficientPoolBalance { .. } | RewardExhausted(_) => ErrorKind::InsufficientFunds,
            Store(e) => e.kind(),
        }
    }
}
