//! Ed25519 oracle key handling.

use ed25519_dalek::{SigningKey, VerifyingKey};
use thiserror::Error;

/// The oracle's signing key and its public half.
pub struct OracleKeyPair {
    pub signing: SigningKey,
    pub public: VerifyingKey,
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("public key is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("public key must be 32 bytes, got {0}")]
    Length(usize),

    #[error("public key is not a valid Ed25519 point")]
    InvalidPoint,
}

/// Derive an oracle key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> OracleKeyPair {
    let signing = SigningKey::from_bytes(seed);
    let public = signing.verifying_key();
    OracleKeyPair { signing, public }
}

/// Parse a hex-encoded Ed25519 public key, as it appears in configuration.
pub fn parse_public_key(hex_str: &str) -> Result<VerifyingKey, KeyError> {
    let bytes = hex::decode(hex_str.trim())?;
    let arr: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| KeyError::Length(bytes.len()))?;
    VerifyingKey::from_bytes(&arr).map_err(|_| KeyError::InvalidPoint)
}
