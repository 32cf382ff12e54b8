//! Test fixtures: a loopback mount and a recording listener

use mantel_core::{Command, Destination, Timing};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::listener::{StateChange, StateListener};
use crate::registry::Actuator;

/// Scaled-down timing so loops finish in milliseconds
pub fn fast_timing() -> Timing {
    Timing {
        auto_reset_delay: Duration::from_millis(150),
        debounce_delay: Duration::from_millis(250),
        packet_interval: Duration::from_millis(10),
        auto_stop_timeout: Duration::from_millis(400),
        burst_repeats: 3,
        burst_gap: Duration::from_millis(10),
    }
}

/// Give in-flight loopback datagrams time to land
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(60)).await;
}

/// UDP socket on loopback that records every datagram it receives
pub struct MockMount {
    port: u16,
    packets: Arc<Mutex<Vec<Vec<u8>>>>,
    task: JoinHandle<()>,
}

impl MockMount {
    pub async fn start() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();
        let packets = Arc::new(Mutex::new(Vec::new()));

        let sink = packets.clone();
        let task = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            while let Ok((len, _)) = socket.recv_from(&mut buf).await {
                sink.lock().unwrap().push(buf[..len].to_vec());
            }
        });

        Self {
            port,
            packets,
            task,
        }
    }

    pub fn destination(&self) -> Destination {
        Destination::new("127.0.0.1", self.port)
    }

    pub fn packets(&self) -> Vec<Vec<u8>> {
        self.packets.lock().unwrap().clone()
    }

    pub fn count(&self, command: Command) -> usize {
        self.packets
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_slice() == command.as_bytes())
            .count()
    }

    /// Records state flips together with the number of stop datagrams
    /// the mount had seen at that moment
    pub fn recorder(&self) -> Arc<Recorder> {
        Arc::new(Recorder {
            packets: self.packets.clone(),
            changes: Mutex::new(Vec::new()),
            times: Mutex::new(Vec::new()),
        })
    }
}

impl Drop for MockMount {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct Recorder {
    packets: Arc<Mutex<Vec<Vec<u8>>>>,
    changes: Mutex<Vec<(bool, usize)>>,
    times: Mutex<Vec<Instant>>,
}

impl Recorder {
    /// Observed on/off sequence
    pub fn states(&self) -> Vec<bool> {
        self.changes.lock().unwrap().iter().map(|(on, _)| *on).collect()
    }

    /// Observed flips with the stop datagram count at notification time
    pub fn changes(&self) -> Vec<(bool, usize)> {
        self.changes.lock().unwrap().clone()
    }

    /// When each flip was observed
    pub fn times(&self) -> Vec<Instant> {
        self.times.lock().unwrap().clone()
    }
}

impl StateListener for Recorder {
    fn state_changed(&self, change: StateChange) {
        let stops = self
            .packets
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_slice() == Command::STOP.as_bytes())
            .count();
        self.changes.lock().unwrap().push((change.is_on, stops));
        self.times.lock().unwrap().push(Instant::now());
    }
}

/// Listener that reads the actuator state back from inside the callback,
/// the way a host publishing the new state does
#[derive(Default)]
pub struct ReadBack {
    actuator: OnceLock<Actuator>,
    seen: Mutex<Vec<bool>>,
}

impl ReadBack {
    pub fn watch(&self, actuator: Actuator) {
        let _ = self.actuator.set(actuator);
    }

    /// `is_on` as read during each notification
    pub fn seen(&self) -> Vec<bool> {
        self.seen.lock().unwrap().clone()
    }
}

impl StateListener for ReadBack {
    fn state_changed(&self, _change: StateChange) {
        if let Some(actuator) = self.actuator.get() {
            let is_on = actuator.is_on();
            self.seen.lock().unwrap().push(is_on);
        }
    }
}
