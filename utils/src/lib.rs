//! Shared utilities for GridPledge.

pub mod logging;

pub use logging::env_filter;
