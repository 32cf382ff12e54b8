//! One mount, its actuators, and the state event stream

use mantel_core::{ActuatorDescriptor, Destination, Timing};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::listener::StateChange;
use crate::registry::{build_actuators, Actuator};

/// Capacity of the state change channel
const EVENT_CAPACITY: usize = 100;

/// Everything a host needs to drive one mount.
///
/// Created at setup, torn down with [`MountRemote::shutdown`]. State flips
/// of every actuator are published on a broadcast channel.
pub struct MountRemote {
    destination: Destination,
    actuators: Vec<Actuator>,
    events: broadcast::Sender<StateChange>,
}

impl MountRemote {
    pub fn new<I>(destination: Destination, descriptors: I, timing: Timing) -> Self
    where
        I: IntoIterator<Item = &'static ActuatorDescriptor>,
    {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let listener = Arc::new(events.clone());
        let actuators = build_actuators(&destination, descriptors, timing, listener);

        info!(
            dest = %destination,
            actuators = actuators.len(),
            "Mount remote ready"
        );

        Self {
            destination,
            actuators,
            events,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn actuators(&self) -> &[Actuator] {
        &self.actuators
    }

    /// Find an actuator by key
    pub fn get(&self, key: &str) -> Option<&Actuator> {
        self.actuators.iter().find(|a| a.key() == key)
    }

    /// Subscribe to state changes of every actuator
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.events.subscribe()
    }

    /// Switch off everything that is on. Running directional loops are
    /// cancelled and followed by their stop burst; loops that already timed
    /// out are waited on until their stop burst is out.
    pub async fn shutdown(&self) {
        let mut tasks = JoinSet::new();
        let count = self.actuators.iter().filter(|a| a.is_on()).count();

        for actuator in &self.actuators {
            let actuator = actuator.clone();
            tasks.spawn(async move { actuator.shutdown().await });
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "Actuator teardown failed");
            }
        }

        info!(dest = %self.destination, stopped = count, "Mount remote shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fast_timing, settle, MockMount};
    use mantel_core::{Command, DESCRIPTORS};
    use std::time::Duration;

    #[tokio::test]
    async fn test_lookup() {
        let dest = Destination::new("10.0.0.5", 81);
        let remote = MountRemote::new(dest, DESCRIPTORS, Timing::default());

        assert_eq!(remote.actuators().len(), DESCRIPTORS.len());
        assert_eq!(remote.get("preset_3").unwrap().key(), "preset_3");
        assert!(remote.get("nope").is_none());
        assert_eq!(remote.destination().port, 81);
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let mount = MockMount::start().await;
        let remote = MountRemote::new(mount.destination(), DESCRIPTORS, fast_timing());
        let mut rx = remote.subscribe();

        remote.get("stop").unwrap().activate().await;

        let on = rx.recv().await.unwrap();
        let off = rx.recv().await.unwrap();
        assert_eq!((on.key, on.is_on), ("stop", true));
        assert_eq!((off.key, off.is_on), ("stop", false));
    }

    #[tokio::test]
    async fn test_shutdown_stops_running_directions() {
        let mount = MockMount::start().await;
        let remote = MountRemote::new(mount.destination(), DESCRIPTORS, fast_timing());

        remote.get("down").unwrap().activate().await;
        remote.get("right").unwrap().activate().await;
        assert!(remote.get("down").unwrap().is_on());

        remote.shutdown().await;
        settle().await;

        assert!(remote.actuators().iter().all(|a| !a.is_on()));
        assert_eq!(mount.count(Command::STOP), 6);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_timed_out_loop() {
        let mount = MockMount::start().await;
        let timing = Timing {
            burst_gap: Duration::from_millis(100),
            ..fast_timing()
        };
        let remote = MountRemote::new(mount.destination(), DESCRIPTORS, timing);

        remote.get("left").unwrap().activate().await;
        tokio::time::sleep(timing.auto_stop_timeout + Duration::from_millis(50)).await;
        assert!(!remote.get("left").unwrap().is_on());

        remote.shutdown().await;
        settle().await;
        assert_eq!(mount.count(Command::STOP), 3);
    }

    #[tokio::test]
    async fn test_shutdown_when_idle_sends_nothing() {
        let mount = MockMount::start().await;
        let remote = MountRemote::new(mount.destination(), DESCRIPTORS, fast_timing());

        remote.shutdown().await;
        settle().await;

        assert!(mount.packets().is_empty());
    }
}
