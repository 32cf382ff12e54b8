//! Configuration loading and validation

use anyhow::Result;
use mantel_core::{
    find_descriptor, ActuatorDescriptor, DescriptorError, Destination, DEFAULT_PORT, DESCRIPTORS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Mount host is required (set [mount] host or pass --host)")]
    MissingHost,
    #[error("Mount port must be non-zero")]
    InvalidPort,
    #[error(transparent)]
    UnknownActuator(#[from] DescriptorError),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub mount: MountConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Bind address for web server
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountConfig {
    /// Hostname or IP address of the mount controller
    #[serde(default)]
    pub host: Option<String>,
    /// UDP port of the mount controller
    #[serde(default = "default_port")]
    pub port: u16,
    /// Actuator keys to expose (all when absent)
    #[serde(default)]
    pub actuators: Option<Vec<String>>,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            actuators: None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Config {
    /// Destination of the mount, rejecting a missing host or a zero port
    pub fn destination(&self) -> Result<Destination, ConfigError> {
        let host = self
            .mount
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHost)?;

        if self.mount.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        Ok(Destination::new(host, self.mount.port))
    }

    /// Descriptors of the actuators to expose, in table order
    pub fn descriptors(&self) -> Result<Vec<&'static ActuatorDescriptor>, ConfigError> {
        match &self.mount.actuators {
            None => Ok(DESCRIPTORS.iter().collect()),
            Some(keys) => {
                for key in keys {
                    find_descriptor(key)?;
                }
                Ok(DESCRIPTORS
                    .iter()
                    .filter(|d| keys.iter().any(|k| k == d.key))
                    .collect())
            }
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let config = Config {
        daemon: DaemonConfig::default(),
        mount: MountConfig {
            host: Some("192.168.1.50".to_string()),
            port: DEFAULT_PORT,
            actuators: None,
        },
    };

    let content = toml::to_string_pretty(&config)?;
    std::fs::write(path, content)?;
    Ok(())
}
