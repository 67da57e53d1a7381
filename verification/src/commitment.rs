//! Per-participant commitment and verification records.

use gridpledge_types::{Amount, Kwh, Nonce};
use serde::{Deserialize, Serialize};

/// What has happened to a commitment's stake. `Slashed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeStatus {
    Locked,
    Slashed,
}

/// A participant's pledge for one event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Pledged reduction, compared against the achieved reduction percentage.
    pub committed_kwh: Kwh,
    pub staked: Amount,
    /// Expected consumption without any reduction effort.
    pub baseline_kwh: Kwh,
    /// Nonce bound into the oracle's reading signature.
    pub nonce: Nonce,
    pub stake: StakeStatus,
}

/// The oracle-attested outcome for one participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub actual_kwh: Kwh,
    /// 0..=100.
    pub score: u8,
    pub verified: bool,
    pub reduction_kwh: Kwh,
}
