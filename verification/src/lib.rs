//! Commitment verification for demand-reduction events.
//!
//! Lifecycle of one event:
//! 1. **Creation**: the oracle opens a time-boxed event.
//! 2. **Commitment**: participants pledge a reduction target against a baseline and stake.
//! 3. **Attestation**: after the oracle ends the event it submits each participant's
//!    signed meter reading; the engine scores it against the pledge.
//! 4. **Slashing**: participants scoring below the minimum forfeit their stake.
//!
//! How readings are attested is pluggable through
//! [`gridpledge_crypto::SignatureOracle`].

pub mod commitment;
pub mod engine;
pub mod error;
pub mod event;
pub mod scoring;

pub use commitment::{Commitment, StakeStatus, Verification};
pub use engine::{BatchOutcome, EngineEvent, OracleOutcome, VerificationEngine};
pub use error::VerificationError;
pub use event::{Event, EventStatus};
pub use scoring::{score_reading, ScoreBreakdown};
