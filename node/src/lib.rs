//! GridPledge node: wires the protocol components together.
//!
//! The node owns:
//! - the verification engine (events, commitments, readings, slashing)
//! - the reward ledger (balances, pools, claims)
//! - the reward distributor (score-proportional payouts)
//!
//! It resolves the current time from a [`gridpledge_types::Clock`], registers
//! the distributor's operator identity with the ledger, and loads its
//! configuration from TOML.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod node;

pub use config::NodeConfig;
pub use error::NodeError;
pub use events::{EventBus, NodeEvent};
pub use logging::{init_logging, LogFormat};
pub use node::RewardNode;
