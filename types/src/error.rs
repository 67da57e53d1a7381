//! The fixed error-kind enumeration shared by every component.
//!
//! Each crate keeps its own descriptive error enum; `kind()` on those enums
//! projects them onto this closed set so callers can branch on the class of
//! failure without matching crate-specific variants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Class of a failed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum ErrorKind {
    #[error("caller is not authorized")]
    Unauthorized,

    #[error("component is paused")]
    Paused,

    #[error("invalid identifier")]
    InvalidIdentifier,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("not found")]
    NotFound,

    #[error("already exists or already done")]
    AlreadyDone,

    #[error("expired or not yet eligible")]
    NotEligible,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("batch limit exceeded")]
    BatchLimitExceeded,

    #[error("verification failed")]
    VerificationFailed,
}
