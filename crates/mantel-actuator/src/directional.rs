//! Directional actuator: repeat a jog command while held
//!
//! States: idle, running, stopping (by request or by timeout). A start
//! request inside the debounce window is dropped. A running actuator owns
//! exactly one send loop; the loop is stopped cooperatively through a
//! oneshot signal that it checks on every packet interval, and it stops
//! itself after the auto-stop timeout. Both stop paths end with a stop
//! burst on the wire.

use mantel_core::{ActuatorDescriptor, Command, Destination, Timing};
use mantel_udp::UdpLink;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use crate::listener::{StateChange, StateListener};

/// Continuous actuator for the four jog directions
#[derive(Clone)]
pub struct DirectionalActuator {
    inner: Arc<Inner>,
}

struct Inner {
    descriptor: &'static ActuatorDescriptor,
    destination: Destination,
    timing: Timing,
    listener: Arc<dyn StateListener>,
    state: Mutex<State>,
    /// Serializes activate/deactivate so a start never races a stop
    transitions: tokio::sync::Mutex<()>,
}

#[derive(Default)]
struct State {
    is_on: bool,
    last_trigger: Option<Instant>,
    run: Option<SendLoop>,
}

/// Handle to a live send loop
struct SendLoop {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_on(&self) -> bool {
        self.state().is_on
    }

    fn notify(&self, is_on: bool) {
        self.listener
            .state_changed(StateChange::new(self.descriptor, is_on));
    }

    async fn send_stop(&self) {
        let result = mantel_udp::send(
            Command::STOP,
            &self.destination,
            self.timing.burst_repeats,
            self.timing.burst_gap,
        )
        .await;

        if let Err(e) = result {
            error!(key = self.descriptor.key, error = %e, "Error sending stop command");
        }
    }
}

impl DirectionalActuator {
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
                state: Mutex::new(State::default()),
                transitions: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub fn descriptor(&self) -> &'static ActuatorDescriptor {
        self.inner.descriptor
    }

    pub fn is_on(&self) -> bool {
        self.inner.is_on()
    }

    /// Start holding the direction.
    ///
    /// Returns as soon as the loop is started; it does not wait for the run
    /// to end.
    pub async fn activate(&self) {
        let now = Instant::now();
        let inner = &self.inner;
        let key = inner.descriptor.key;
        let _transition = inner.transitions.lock().await;

        let previous = {
            let mut state = inner.state();

            if let Some(last) = state.last_trigger {
                if now.saturating_duration_since(last) < inner.timing.debounce_delay {
                    debug!(key = key, "Debouncing rapid trigger");
                    return;
                }
            }
            state.last_trigger = Some(now);

            if state.is_on {
                debug!(key = key, "Already on, ignoring");
                return;
            }

            state.is_on = true;
            // A run that timed out may still be sending its stop burst; the
            // new loop waits for it so two loops never overlap on the wire.
            state.run.take().map(|run| run.handle)
        };

        // The listener may read the state back, so the lock is released first
        inner.notify(true);

        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(send_loop(inner.clone(), stop_rx, previous));
        inner.state().run = Some(SendLoop { stop, handle });

        info!(key = key, command = %inner.descriptor.command, "Started continuous command");
    }

    /// Stop holding the direction: cancel the loop, wait for it, send stop.
    pub async fn deactivate(&self) {
        let inner = &self.inner;
        let key = inner.descriptor.key;
        let _transition = inner.transitions.lock().await;

        let run = {
            let mut state = inner.state();
            if !state.is_on {
                debug!(key = key, "Already off, ignoring");
                return;
            }
            state.is_on = false;
            state.run.take()
        };
        inner.notify(false);

        if let Some(run) = run {
            // The loop may already be gone; a closed channel is fine
            let _ = run.stop.send(());
            match run.handle.await {
                Ok(()) => debug!(key = key, "Send loop cancelled"),
                Err(e) => warn!(key = key, error = %e, "Send loop ended abnormally"),
            }
        }

        inner.send_stop().await;
        info!(key = key, "Stopped continuous command");
    }

    /// Stop the direction if it is held, then wait out any loop that is
    /// still sending its auto-stop burst.
    pub async fn shutdown(&self) {
        self.deactivate().await;

        let _transition = self.inner.transitions.lock().await;
        let run = self.inner.state().run.take();
        if let Some(run) = run {
            if let Err(e) = run.handle.await {
                warn!(key = self.inner.descriptor.key, error = %e, "Send loop ended abnormally");
            }
        }
    }
}

/// Repeat the command until cancelled, switched off, or timed out
async fn send_loop(
    inner: Arc<Inner>,
    mut stop: oneshot::Receiver<()>,
    previous: Option<JoinHandle<()>>,
) {
    let key = inner.descriptor.key;
    let command = inner.descriptor.command;
    let timing = inner.timing;

    if let Some(previous) = previous {
        let _ = previous.await;
    }

    match UdpLink::open(&inner.destination).await {
        Ok(link) => {
            let cutoff = tokio::time::sleep_until(Instant::now() + timing.auto_stop_timeout);
            tokio::pin!(cutoff);

            while inner.is_on() {
                tokio::select! {
                    biased;
                    _ = &mut stop => {
                        return;
                    }
                    _ = &mut cutoff => {
                        break;
                    }
                    _ = async {
                        if let Err(e) = link.send(command).await {
                            warn!(key = key, error = %e, "Error in continuous send");
                        }
                        tokio::time::sleep(timing.packet_interval).await;
                    } => {
                        trace!(key = key, "Packet interval elapsed");
                    }
                }
            }
        }
        Err(e) => {
            error!(
                key = key,
                dest = %inner.destination,
                error = %e,
                "Cannot open send loop socket"
            );
        }
    }

    let timed_out = {
        let mut state = inner.state();
        std::mem::replace(&mut state.is_on, false)
    };

    if timed_out {
        inner.notify(false);
        info!(
            key = key,
            timeout_ms = timing.auto_stop_timeout.as_millis() as u64,
            "Auto-stopping continuous command"
        );
        inner.send_stop().await;
    }
}
