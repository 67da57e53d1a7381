//! Signing and verifying oracle readings.
//!
//! Wire format of a reading signature (65 bytes):
//! `ed25519_signature (64) || scheme (1)`. Only [`SCHEME_ED25519`] is accepted.

use crate::hash::reading_digest;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use gridpledge_types::params::SIGNATURE_LEN;
use gridpledge_types::{EventId, Kwh, Nonce, Principal};

/// Scheme byte for a plain Ed25519 signature over the reading digest.
pub const SCHEME_ED25519: u8 = 0x00;

/// Sign a reading, producing the 65-byte wire signature.
pub fn sign_reading(
    key: &SigningKey,
    event: EventId,
    user: &Principal,
    actual_kwh: Kwh,
    nonce: Nonce,
) -> [u8; SIGNATURE_LEN] {
    let digest = reading_digest(event, user, actual_kwh, nonce);
    let sig = key.sign(&digest);
    let mut out = [0u8; SIGNATURE_LEN];
    out[..64].copy_from_slice(&sig.to_bytes());
    out[64] = SCHEME_ED25519;
    out
}

/// Verify a 65-byte reading signature against the oracle's public key.
///
/// Returns `false` for wrong length, unknown scheme, or a bad signature.
pub fn verify_reading(
    key: &VerifyingKey,
    event: EventId,
    user: &Principal,
    actual_kwh: Kwh,
    signature: &[u8],
    nonce: Nonce,
) -> bool {
    if signature.len() != SIGNATURE_LEN || signature[64] != SCHEME_ED25519 {
        return false;
    }
    let Ok(raw): Result<[u8; 64], _> = signature[..64].try_into() else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&raw);
    let digest = reading_digest(event, user, actual_kwh, nonce);
    key.verify(&digest, &sig).is_ok()
}
