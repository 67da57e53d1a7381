//! Reward distribution.
//!
//! After an event ends, its linked pool's balance is split among the listed
//! participants in proportion to their verification scores. Scores and pool
//! funds are read through the [`ScoreSource`] and [`PoolFunds`] traits so the
//! distributor does not own either collaborator.

pub mod distributor;
pub mod error;
pub mod sources;

pub use distributor::{DistributionReport, Payout, RewardDistributor};
pub use error::DistributorError;
pub use sources::{PoolFunds, ScoreSource};
