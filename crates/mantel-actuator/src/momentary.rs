//! Momentary actuator: fire a burst, pulse on, reset

use mantel_core::{ActuatorDescriptor, Destination, Timing};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

use crate::listener::{StateChange, StateListener};

/// One-shot actuator for stop, home, preset and save commands.
///
/// There is no debounce or re-entrancy guard: overlapping activations each
/// run their own pulse, and the first reset to fire turns the switch off.
#[derive(Clone)]
pub struct MomentaryActuator {
    inner: Arc<Inner>,
}

struct Inner {
    descriptor: &'static ActuatorDescriptor,
    destination: Destination,
    timing: Timing,
    listener: Arc<dyn StateListener>,
    is_on: Mutex<bool>,
}

impl Inner {
    fn is_on(&self) -> MutexGuard<'_, bool> {
        self.is_on.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Flip the state and notify; returns false if already in that state
    fn set_on(&self, on: bool) -> bool {
        if std::mem::replace(&mut *self.is_on(), on) == on {
            return false;
        }
        // Guard is released; the listener may read the state back
        self.listener
            .state_changed(StateChange::new(self.descriptor, on));
        true
    }
}

impl MomentaryActuator {
    pub fn new(
        descriptor: &'static ActuatorDescriptor,
        destination: Destination,
        timing: Timing,
        listener: Arc<dyn StateListener>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                descriptor,
                destination,
                timing,
                listener,
                is_on: Mutex::new(false),
            }),
        }
    }

    pub fn descriptor(&self) -> &'static ActuatorDescriptor {
        self.inner.descriptor
    }

    pub fn is_on(&self) -> bool {
        *self.inner.is_on()
    }

    /// Send the command burst and pulse the switch on for the reset delay.
    ///
    /// The burst runs on its own task so the on state is reported without
    /// waiting for the inter-packet gaps. Off is reported after the reset
    /// delay even if the burst is still resolving or sending; the burst has
    /// always finished by the time this returns.
    pub async fn activate(&self) {
        let inner = &self.inner;
        let key = inner.descriptor.key;
        debug!(key = key, "Sending momentary command");

        let burst = tokio::spawn({
            let command = inner.descriptor.command;
            let destination = inner.destination.clone();
            let timing = inner.timing;
            async move {
                mantel_udp::send(command, &destination, timing.burst_repeats, timing.burst_gap)
                    .await
            }
        });

        inner.set_on(true);
        tokio::time::sleep(inner.timing.auto_reset_delay).await;
        inner.set_on(false);

        match burst.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(
                    key = key,
                    command = %inner.descriptor.command,
                    error = %e,
                    "Error sending UDP command"
                );
            }
            Err(e) => {
                error!(key = key, error = %e, "Command burst task failed");
            }
        }
    }

    /// Turn off ahead of the auto-reset. Sends nothing.
    pub async fn deactivate(&self) {
        if !self.inner.set_on(false) {
            debug!(key = self.inner.descriptor.key, "Already off, ignoring");
        }
    }
}
