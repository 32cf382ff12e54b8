//! Timing parameters of the actuator control loops

use std::time::Duration;

/// Delay before a momentary actuator reports off again
pub const AUTO_RESET_DELAY: Duration = Duration::from_secs(1);
/// Window in which a repeated directional start is ignored
pub const DEBOUNCE_DELAY: Duration = Duration::from_secs(2);
/// Cadence of directional packets while held
pub const PACKET_INTERVAL: Duration = Duration::from_millis(124);
/// Hard limit on a single directional run
pub const AUTO_STOP_TIMEOUT: Duration = Duration::from_secs(5);
/// Sends per burst (momentary commands and stop)
pub const BURST_REPEATS: u32 = 3;
/// Gap between sends inside a burst
pub const BURST_GAP: Duration = Duration::from_millis(100);

/// Control loop timing, shared by every actuator of one mount.
///
/// These are not user settings. `Timing::default()` is what the mount
/// expects; other values exist so the loops can be exercised quickly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub auto_reset_delay: Duration,
    pub debounce_delay: Duration,
    pub packet_interval: Duration,
    pub auto_stop_timeout: Duration,
    pub burst_repeats: u32,
    pub burst_gap: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            auto_reset_delay: AUTO_RESET_DELAY,
            debounce_delay: DEBOUNCE_DELAY,
            packet_interval: PACKET_INTERVAL,
            auto_stop_timeout: AUTO_STOP_TIMEOUT,
            burst_repeats: BURST_REPEATS,
            burst_gap: BURST_GAP,
        }
    }
}
