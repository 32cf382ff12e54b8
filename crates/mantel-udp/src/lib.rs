//! Mantel UDP - Command transport for the mount controller
//!
//! The controller speaks a one-way protocol: short ASCII commands in UDP
//! datagrams, no acknowledgments. This crate sends them and provides the
//! setup-time reachability probe.

pub mod probe;
pub mod transport;

pub use probe::{probe_mount, ProbeError, PROBE_TIMEOUT_MS};
pub use transport::{send, TransportError, UdpLink};
