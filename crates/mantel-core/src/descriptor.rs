//! Actuator descriptors
//!
//! The descriptor table is the single source of truth for which switches
//! exist, how they behave, and which command each one fires.

use serde::Serialize;
use thiserror::Error;

use crate::command::Command;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Unknown actuator key: {0}")]
    UnknownKey(String),
}

/// How an actuator reacts to being switched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorKind {
    /// Fires a burst, reports on, resets itself after a fixed delay
    Momentary,
    /// Repeats its command while held, with debounce and auto-stop
    Directional,
}

/// Static description of one actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActuatorDescriptor {
    /// Unique key (e.g., "up", "preset_1")
    pub key: &'static str,
    /// Human-readable name
    pub name: &'static str,
    pub kind: ActuatorKind,
    pub command: Command,
}

impl ActuatorDescriptor {
    const fn directional(key: &'static str, name: &'static str, command: Command) -> Self {
        Self {
            key,
            name,
            kind: ActuatorKind::Directional,
            command,
        }
    }

    const fn momentary(key: &'static str, name: &'static str, command: Command) -> Self {
        Self {
            key,
            name,
            kind: ActuatorKind::Momentary,
            command,
        }
    }

    /// Host-facing entity identifier
    pub fn entity_id(&self) -> String {
        format!("switch.mantel_mount_{}", self.key)
    }
}

/// Every actuator the mount exposes, in registration order
pub const DESCRIPTORS: &[ActuatorDescriptor] = &[
    ActuatorDescriptor::directional("up", "Mantel Mount Up", Command::UP),
    ActuatorDescriptor::directional("down", "Mantel Mount Down", Command::DOWN),
    ActuatorDescriptor::directional("left", "Mantel Mount Left", Command::LEFT),
    ActuatorDescriptor::directional("right", "Mantel Mount Right", Command::RIGHT),
    ActuatorDescriptor::momentary("stop", "Mantel Mount Stop", Command::STOP),
    ActuatorDescriptor::momentary("home", "Mantel Mount Home", Command::HOME),
    ActuatorDescriptor::momentary("preset_1", "Mantel Mount Preset 1", Command::RECALL_1),
    ActuatorDescriptor::momentary("preset_2", "Mantel Mount Preset 2", Command::RECALL_2),
    ActuatorDescriptor::momentary("preset_3", "Mantel Mount Preset 3", Command::RECALL_3),
    ActuatorDescriptor::momentary("save_1", "Mantel Mount Save 1", Command::SAVE_1),
    ActuatorDescriptor::momentary("save_2", "Mantel Mount Save 2", Command::SAVE_2),
    ActuatorDescriptor::momentary("save_3", "Mantel Mount Save 3", Command::SAVE_3),
];

/// Look up a descriptor by key
pub fn find_descriptor(key: &str) -> Result<&'static ActuatorDescriptor, DescriptorError> {
    DESCRIPTORS
        .iter()
        .find(|d| d.key == key)
        .ok_or_else(|| DescriptorError::UnknownKey(key.to_string()))
}
