use gridpledge_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: String,
        needed: u128,
        available: u128,
    },

    #[error("balance overflow for {0}")]
    Overflow(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::InsufficientBalance { .. } => ErrorKind::InsufficientFunds,
            StoreError::Overflow(_) => ErrorKind::InvalidAmount,
        }
    }
}
