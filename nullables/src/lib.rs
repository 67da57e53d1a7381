//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators (clock, signature oracle) are abstracted behind
//! traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record how they were called
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod oracle;

pub use clock::NullClock;
pub use oracle::NullOracle;
