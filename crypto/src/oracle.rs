//! The signature-oracle seam.
//!
//! The verification engine does not know how readings are attested, only
//! that an oracle accepted them. Different attestation schemes plug in here.

use crate::sign::verify_reading;
use ed25519_dalek::VerifyingKey;
use gridpledge_types::{EventId, Kwh, Nonce, Principal};

/// Checks that a reading was attested by the trusted meter oracle.
pub trait SignatureOracle {
    /// Whether `signature` attests `actual_kwh` for `user` in `event` under `nonce`.
    fn verify(
        &self,
        event: EventId,
        user: &Principal,
        actual_kwh: Kwh,
        signature: &[u8],
        nonce: Nonce,
    ) -> bool;
}

/// Accepts readings signed by a single Ed25519 oracle key.
pub struct Ed25519ReadingOracle {
    key: VerifyingKey,
}

impl Ed25519ReadingOracle {
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }
}

impl SignatureOracle for Ed25519ReadingOracle {
    fn verify(
        &self,
        event: EventId,
        user: &Principal,
        actual_kwh: Kwh,
        signature: &[u8],
        nonce: Nonce,
    ) -> bool {
        verify_reading(&self.key, event, user, actual_kwh, signature, nonce)
    }
}

impl<T: SignatureOracle + ?Sized> SignatureOracle for Box<T> {
    fn verify(
        &self,
        event: EventId,
        user: &Principal,
        actual_kwh: Kwh,
        signature: &[u8],
        nonce: Nonce,
    ) -> bool {
        (**self).verify(event, user, actual_kwh, signature, nonce)
    }
}

impl<T: SignatureOracle + ?Sized> SignatureOracle for std::rc::Rc<T> {
    fn verify(
        &self,
        event: EventId,
        user: &Principal,
        actual_kwh: Kwh,
        signature: &[u8],
        nonce: Nonce,
    ) -> bool {
        (**self).verify(event, user, actual_kwh, signature, nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;
    use crate::sign::sign_reading;

    #[test]
    fn oracle_accepts_signed_reading() {
        let kp = keypair_from_seed(&[9u8; 32]);
        let oracle = Ed25519ReadingOracle::new(kp.public);
        let user = Principal::new("alice");
        let sig = sign_reading(&kp.signing, EventId::new(5), &user, 42, 1);
        assert!(oracle.verify(EventId::new(5), &user, 42, &sig, 1));
        assert!(!oracle.verify(EventId::new(5), &user, 43, &sig, 1));
    }
}
