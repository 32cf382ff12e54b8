//! Setup-time reachability probe

use mantel_core::{Command, Destination};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::transport::{TransportError, UdpLink};

/// Probe timeout in milliseconds
pub const PROBE_TIMEOUT_MS: u64 = 1000;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Cannot connect to mount at {destination}: {source}")]
    CannotConnect {
        destination: Destination,
        #[source]
        source: TransportError,
    },
    #[error("Timed out probing mount at {0}")]
    Timeout(Destination),
}

/// Check that the mount address is usable by firing a single stop command.
///
/// The mount never answers, so this only proves that the address resolves
/// and a datagram can be sent to it.
pub async fn probe_mount(destination: &Destination) -> Result<(), ProbeError> {
    debug!(dest = %destination, "Probing mount");

    let attempt = timeout(Duration::from_millis(PROBE_TIMEOUT_MS), async {
        let link = UdpLink::open(destination).await?;
        link.send(Command::STOP).await
    })
    .await;

    match attempt {
        Ok(Ok(())) => {
            info!(dest = %destination, "Mount reachable");
            Ok(())
        }
        Ok(Err(source)) => Err(ProbeError::CannotConnect {
            destination: destination.clone(),
            source,
        }),
        Err(_) => Err(ProbeError::Timeout(destination.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UdpSocket;

    #[tokio::test]
    async fn test_probe_sends_stop() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let dest = Destination::new("127.0.0.1", socket.local_addr().unwrap().port());

        probe_mount(&dest).await.unwrap();

        let mut buf = [0u8; 16];
        let (len, _) = timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf[..len], b"MMJ0\r");
    }

    #[tokio::test]
    async fn test_probe_bad_host() {
        let dest = Destination::new("mount.invalid", 81);
        assert!(probe_mount(&dest).await.is_err());
    }
}
