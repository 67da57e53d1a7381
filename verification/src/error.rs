use gridpledge_types::{ErrorKind, EventId, Nonce, Principal, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("{0} is not the oracle")]
    Unauthorized(Principal),

    #[error("verification engine is paused")]
    Paused,

    #[error("invalid event id {0}")]
    InvalidEventId(EventId),

    #[error("{0} is not a valid participant")]
    InvalidUser(Principal),

    #[error("event schedule {start}..{end} is invalid at {now}")]
    InvalidSchedule {
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    },

    #[error("{0} already exists")]
    EventExists(EventId),

    #[error("{0} not found")]
    EventNotFound(EventId),

    #[error("{0} has already ended")]
    EventAlreadyEnded(EventId),

    #[error("{0} is no longer accepting commitments")]
    EventClosed(EventId),

    #[error("{0} is still active")]
    EventStillActive(EventId),

    #[error("{user} already committed to {event}")]
    AlreadyCommitted { event: EventId, user: Principal },

    #[error("committed reduction must be non-zero")]
    InvalidCommitted,

    #[error("stake must be non-zero")]
    InvalidStake,

    #[error("baseline must be non-zero")]
    InvalidBaseline,

    #[error("nonce {0} has already been used")]
    NonceUsed(Nonce),

    #[error("{user} has no commitment for {event}")]
    NotCommitted { event: EventId, user: Principal },

    #[error("{user} is already verified for {event}")]
    AlreadyVerified { event: EventId, user: Principal },

    #[error("signature must be {expected} bytes, got {got}")]
    InvalidSignatureLength { expected: usize, got: usize },

    #[error("oracle rejected the reading signature")]
    SignatureRejected,

    #[error("no verification for {user} in {event}")]
    VerificationNotFound { event: EventId, user: Principal },

    #[error("reward multiplier resolves to zero")]
    ZeroMultiplier,

    #[error("batch of {len} exceeds limit {limit}")]
    BatchLimitExceeded { len: usize, limit: usize },

    #[error("score threshold {0} exceeds 100")]
    InvalidScore(u8),

    #[error("penalty rate {0} exceeds 100")]
    InvalidPenalty(u8),

    #[error("reward multiplier must be non-zero")]
    InvalidMultiplier,

    #[error("arithmetic overflow in reward computation")]
    Overflow,
}

impl VerificationError {
    pub fn kind(&self) -> ErrorKind {
        use VerificationError::*;
        match self {
            Unauthorized(_) => ErrorKind::Unauthorized,
            Paused => ErrorKind::Paused,
            InvalidEventId(_) | InvalidUser(_) => ErrorKind::InvalidIdentifier,
            InvalidSchedule { .. } | EventClosed(_) | EventStillActive(_) => {
                ErrorKind::NotEligible
            }
            EventExists(_)
            | EventAlreadyEnded(_)
            | AlreadyCommitted { .. }
            | NonceUsed(_)
            | AlreadyVerified { .. } => ErrorKind::AlreadyDone,
            EventNotFound(_) | NotCommitted { .. } | VerificationNotFound { .. } => {
                ErrorKind::NotFound
            }
            InvalidCommitted | InvalidStake | InvalidBaseline | ZeroMultiplier | InvalidScore(_)
            | InvalidPenalty(_) | InvalidMultiplier | Overflow => ErrorKind::InvalidAmount,
            InvalidSignatureLength { .. } | SignatureRejected => ErrorKind::VerificationFailed,
            BatchLimitExceeded { .. } => ErrorKind::BatchLimitExceeded,
        }
    }
}
