//! State change notifications towards the host

use chrono::{DateTime, Utc};
use mantel_core::ActuatorDescriptor;
use serde::Serialize;
use tokio::sync::broadcast;

/// An actuator flipped its on/off state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateChange {
    pub key: &'static str,
    pub entity_id: String,
    pub is_on: bool,
    pub at: DateTime<Utc>,
}

impl StateChange {
    pub fn new(descriptor: &ActuatorDescriptor, is_on: bool) -> Self {
        Self {
            key: descriptor.key,
            entity_id: descriptor.entity_id(),
            is_on,
            at: Utc::now(),
        }
    }
}

/// Receives every state flip, synchronously, before the actuator moves on.
///
/// Implementations must not block.
pub trait StateListener: Send + Sync + 'static {
    fn state_changed(&self, change: StateChange);
}

impl StateListener for broadcast::Sender<StateChange> {
    fn state_changed(&self, change: StateChange) {
        // No subscribers is fine
        let _ = self.send(change);
    }
}
