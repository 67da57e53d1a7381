//! Cryptographic primitives for GridPledge.
//!
//! - **Blake2b** for the canonical digest of an oracle reading
//! - **Ed25519** for signing and verifying readings
//! - The [`SignatureOracle`] seam the verification engine calls through

pub mod hash;
pub mod keys;
pub mod oracle;
pub mod sign;

pub use hash::{blake2b_256_multi, reading_digest};
pub use keys::{keypair_from_seed, parse_public_key, KeyError, OracleKeyPair};
pub use oracle::{Ed25519ReadingOracle, SignatureOracle};
pub use sign::{sign_reading, verify_reading, SCHEME_ED25519};
