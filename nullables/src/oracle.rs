//! Nullable signature oracle.

use gridpledge_crypto::SignatureOracle;
use gridpledge_types::{EventId, Kwh, Nonce, Principal};
use std::cell::{Cell, RefCell};

/// A signature oracle whose verdict is set by the test.
///
/// Every call is recorded so tests can assert which nonce was checked.
pub struct NullOracle {
    accept: Cell<bool>,
    calls: RefCell<Vec<(EventId, Principal, Kwh, Nonce)>>,
}

impl NullOracle {
    /// An oracle that accepts every reading.
    pub fn accepting() -> Self {
        Self {
            accept: Cell::new(true),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// An oracle that rejects every reading.
    pub fn rejecting() -> Self {
        Self {
            accept: Cell::new(false),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn set_accept(&self, accept: bool) {
        self.accept.set(accept);
    }

    /// Calls observed so far, oldest first.
    pub fn calls(&self) -> Vec<(EventId, Principal, Kwh, Nonce)> {
        self.calls.borrow().clone()
    }
}

impl SignatureOracle for NullOracle {
    fn verify(
        &self,
        event: EventId,
        user: &Principal,
        actual_kwh: Kwh,
        _signature: &[u8],
        nonce: Nonce,
    ) -> bool {
        self.calls
            .borrow_mut()
            .push((event, user.clone(), actual_kwh, nonce));
        self.accept.get()
    }
}
