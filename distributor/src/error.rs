use gridpledge_types::{Amount, ErrorKind, EventId, PoolId, Principal};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributorError {
    #[error("{0} is not the distributor admin")]
    Unauthorized(Principal),

    #[error("invalid event id {0}")]
    InvalidEventId(EventId),

    #[error("{0} is not a valid principal")]
    InvalidUser(Principal),

    #[error("{event} is already linked to {pool}")]
    AlreadyLinked { event: EventId, pool: PoolId },

    #[error("rewards for {0} were already distributed")]
    AlreadyDistributed(EventId),

    #[error("batch of {len} exceeds limit {limit}")]
    BatchLimitExceeded { len: usize, limit: usize },

    #[error("{0} is missing or has not ended")]
    EventNotEnded(EventId),

    #[error("{0} has no linked pool")]
    PoolNotLinked(EventId),

    #[error("total score of the batch is zero")]
    ZeroTotalScore,

    #[error("{pool} has balance {balance}")]
    EmptyPool { pool: PoolId, balance: Amount },

    #[error("arithmetic overflow in reward computation")]
    Overflow,
}

impl DistributorError {
    pub fn kind(&self) -> ErrorKind {
        use DistributorError::*;
        match self {
            Unauthorized(_) => ErrorKind::Unauthorized,
            InvalidEventId(_) | InvalidUser(_) => ErrorKind::InvalidIdentifier,
            AlreadyLinked { .. } | AlreadyDistributed(_) => ErrorKind::AlreadyDone,
            BatchLimitExceeded { .. } => ErrorKind::BatchLimitExceeded,
            EventNotEnded(_) => ErrorKind::NotEligible,
            PoolNotLinked(_) => ErrorKind::NotFound,
            ZeroTotalScore | Overflow => ErrorKind::InvalidAmount,
            EmptyPool { .. } => ErrorKind::InsufficientFunds,
        }
    }
}
