//! Async UDP transport for mount commands

use mantel_core::{Command, Destination};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to resolve {0}: {1}")]
    Resolve(Destination, #[source] std::io::Error),
    #[error("No address found for {0}")]
    NoAddress(Destination),
    #[error("Failed to open UDP socket: {0}")]
    Bind(#[source] std::io::Error),
    #[error("Failed to send to {0}: {1}")]
    Send(SocketAddr, #[source] std::io::Error),
}

/// A UDP socket aimed at the mount.
///
/// The socket is released when the link is dropped, so every transmission
/// operation owns exactly one socket for exactly as long as it runs.
#[derive(Debug)]
pub struct UdpLink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpLink {
    /// Resolve the destination and bind an ephemeral socket of the same family
    pub async fn open(destination: &Destination) -> Result<Self, TransportError> {
        let target = resolve(destination).await?;
        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await.map_err(TransportError::Bind)?;

        Ok(Self { socket, target })
    }

    /// Resolved address of the mount
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Send one datagram carrying the command
    pub async fn send(&self, command: Command) -> Result<(), TransportError> {
        self.socket
            .send_to(command.as_bytes(), self.target)
            .await
            .map_err(|e| TransportError::Send(self.target, e))?;
        trace!(addr = %self.target, command = %command, "Sent UDP command");
        Ok(())
    }
}

impl Drop for UdpLink {
    fn drop(&mut self) {
        trace!(addr = %self.target, "Closed UDP socket");
    }
}

async fn resolve(destination: &Destination) -> Result<SocketAddr, TransportError> {
    let mut addrs = lookup_host((destination.host.as_str(), destination.port))
        .await
        .map_err(|e| TransportError::Resolve(destination.clone(), e))?;
    addrs
        .next()
        .ok_or_else(|| TransportError::NoAddress(destination.clone()))
}

/// Send `command` to `destination` `repeats` times, `gap` apart.
///
/// A fresh socket is opened for the burst and closed on every exit path.
/// Nothing is read back; success only means the datagrams left this host.
pub async fn send(
    command: Command,
    destination: &Destination,
    repeats: u32,
    gap: Duration,
) -> Result<(), TransportError> {
    let link = UdpLink::open(destination).await?;

    for i in 0..repeats {
        if i > 0 {
            tokio::time::sleep(gap).await;
        }
        link.send(command).await?;
    }

    debug!(
        dest = %destination,
        command = %command,
        repeats = repeats,
        "Sent command burst"
    );
    Ok(())
}
