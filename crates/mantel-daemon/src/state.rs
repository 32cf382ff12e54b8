//! Application state management

use anyhow::Result;
use mantel_actuator::{Actuator, MountRemote, StateChange};
use mantel_core::Timing;
use mantel_udp::probe_mount;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Shared application state
pub struct AppState {
    /// Actuators of the configured mount
    pub remote: MountRemote,
    /// Configuration
    pub config: Config,
    /// Activations and deactivations requested over the API
    actions: Mutex<JoinSet<()>>,
}

impl AppState {
    /// Validate configuration, probe the mount, and build its actuators.
    ///
    /// Any failure here aborts startup: nothing is registered until the
    /// mount address is known to be usable.
    pub async fn setup(config: Config, probe: bool) -> Result<Arc<Self>> {
        let destination = config.destination()?;
        let descriptors = config.descriptors()?;

        if probe {
            probe_mount(&destination).await?;
        } else {
            warn!(dest = %destination, "Skipping connectivity probe");
        }

        let remote = MountRemote::new(destination, descriptors, Timing::default());
        info!(
            dest = %remote.destination(),
            actuators = remote.actuators().len(),
            "Mount configured"
        );

        Ok(Arc::new(Self {
            remote,
            config,
            actions: Mutex::new(JoinSet::new()),
        }))
    }

    /// Get all actuators
    pub fn actuators(&self) -> &[Actuator] {
        self.remote.actuators()
    }

    /// Get actuator by key
    pub fn get_actuator(&self, key: &str) -> Option<&Actuator> {
        self.remote.get(key)
    }

    /// Subscribe to actuator state changes
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.remote.subscribe()
    }

    /// Run an actuator action in the background; it is awaited on shutdown
    pub fn spawn_action<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut actions = self.actions.lock().unwrap_or_else(|e| e.into_inner());
        // Reap finished actions so the set does not grow
        while actions.try_join_next().is_some() {}
        actions.spawn(action);
    }

    /// Let pending actions finish, then switch everything off before exit
    pub async fn shutdown(&self) {
        let mut actions = {
            let mut actions = self.actions.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *actions)
        };
        debug!(pending = actions.len(), "Waiting for pending actions");
        while let Some(result) = actions.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "Actuator action failed");
            }
        }

        self.remote.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UdpSocket;

    fn config(host: Option<&str>, port: u16) -> Config {
        let mut config = Config::default();
        config.mount.host = host.map(str::to_string);
        config.mount.port = port;
        config
    }

    #[tokio::test]
    async fn test_setup_probes_mount() {
        let mount = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = mount.local_addr().unwrap().port();

        let state = AppState::setup(config(Some("127.0.0.1"), port), true)
            .await
            .unwrap();
        assert_eq!(state.actuators().len(), mantel_core::DESCRIPTORS.len());

        let mut buf = [0u8; 16];
        let (len, _) = mount.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"MMJ0\r");
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_pending_actions() {
        let mount = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = mount.local_addr().unwrap().port();
        let state = AppState::setup(config(Some("127.0.0.1"), port), false)
            .await
            .unwrap();

        let home = state.get_actuator("home").unwrap().clone();
        state.spawn_action(async move { home.activate().await });
        state.shutdown().await;

        // The pulse ran to completion, burst included
        assert!(!state.get_actuator("home").unwrap().is_on());
        let mut buf = [0u8; 16];
        for _ in 0..3 {
            let (len, _) = mount.recv_from(&mut buf).await.unwrap();
            assert_eq!(&buf[..len], b"MMR0\r");
        }
    }

    #[tokio::test]
    async fn test_setup_rejects_missing_host() {
        assert!(AppState::setup(config(None, 81), false).await.is_err());
    }

    #[tokio::test]
    async fn test_setup_fails_when_probe_fails() {
        let result = AppState::setup(config(Some("mount.invalid"), 81), true).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_setup_without_probe() {
        let state = AppState::setup(config(Some("mount.invalid"), 81), false)
            .await
            .unwrap();
        assert!(state.get_actuator("home").is_some());
        assert!(state.get_actuator("sideways").is_none());
    }
}
