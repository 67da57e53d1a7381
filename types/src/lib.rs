//! Fundamental types for GridPledge.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! principals, event/pool identifiers, timestamps and clocks, tunable
//! parameters, and the fixed error-kind enumeration.

pub mod error;
pub mod id;
pub mod params;
pub mod principal;
pub mod time;

pub use error::ErrorKind;
pub use id::{EventId, Nonce, PoolId};
pub use params::{DistributorParams, EngineParams, LedgerParams};
pub use principal::Principal;
pub use time::{Clock, SystemClock, Timestamp};

/// Raw token units. All balances and stakes are whole units.
pub type Amount = u128;

/// Energy readings and commitments, in whole kWh.
pub type Kwh = u128;
