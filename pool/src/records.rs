//! Claim and transfer records kept by the ledger.

use gridpledge_types::{Amount, Principal, Timestamp};
use serde::{Deserialize, Serialize};

/// A principal's claim against one pool. Its presence blocks a second claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaim {
    pub amount: Amount,
    pub timestamp: Timestamp,
}

/// One balance movement between two accounts. Append-only, audit use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub amount: Amount,
    pub from: Principal,
    pub to: Principal,
}
