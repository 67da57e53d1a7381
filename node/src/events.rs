//! Events published by the node for subscribers.

use gridpledge_types::{Amount, EventId, PoolId};
use gridpledge_verification::EngineEvent;

/// Node-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeEvent {
    /// Forwarded from the verification engine.
    Engine(EngineEvent),
    PoolCreated {
        pool: PoolId,
        total_reward: Amount,
    },
    PoolClosed {
        pool: PoolId,
        swept: Amount,
    },
    RewardsDistributed {
        event: EventId,
        pool: PoolId,
        recipients: usize,
        total: Amount,
    },
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the emitting call.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&NodeEvent)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&NodeEvent)>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &NodeEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
