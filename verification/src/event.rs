//! Event records and their one-way status.

use gridpledge_types::{EventId, Timestamp};
use serde::{Deserialize, Serialize};

/// Status of an event. `Ended` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    /// Accepting commitments until `end_time`.
    Active,
    /// Closed by the oracle; readings may now be submitted.
    Ended,
}

/// A time-boxed reduction event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub status: EventStatus,
}

impl Event {
    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    /// Whether a commitment submitted at `now` is still accepted.
    pub fn accepts_commitments(&self, now: Timestamp) -> bool {
        self.is_active() && now <= self.end_time
    }
}
