//! Blake2b hashing for oracle readings.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use gridpledge_types::{EventId, Kwh, Nonce, Principal};

type Blake2b256 = Blake2b<U32>;

/// Domain separator so a reading signature can never be replayed as anything else.
const READING_DOMAIN: &[u8] = b"gridpledge/reading/v1";

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Canonical digest of a meter reading as attested by the oracle.
///
/// The user identity is length-prefixed so that no two distinct
/// `(user, actual)` pairs share an encoding.
pub fn reading_digest(event: EventId, user: &Principal, actual_kwh: Kwh, nonce: Nonce) -> [u8; 32] {
    let user_bytes = user.as_str().as_bytes();
    let user_len = (user_bytes.len() as u64).to_be_bytes();
    blake2b_256_multi(&[
        READING_DOMAIN,
        &event.get().to_be_bytes(),
        &user_len,
        user_bytes,
        &actual_kwh.to_be_bytes(),
        &nonce.to_be_bytes(),
    ])
}
