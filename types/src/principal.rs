//! Caller identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An identity that can hold balances, commit to events, or administer a component.
///
/// The identity/authentication substrate is external; principals are opaque
/// strings compared for equality. One value is reserved as the null (burn)
/// identity, which can never receive funds or act as a participant.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Raw value of the null identity.
    pub const NULL: &'static str = "null";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The null (burn) identity.
    pub fn null() -> Self {
        Self(Self::NULL.to_string())
    }

    pub fn is_null(&self) -> bool {
        self.0 == Self::NULL || self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
