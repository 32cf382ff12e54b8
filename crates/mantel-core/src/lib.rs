//! Mantel Core - Core types for the mantel mount remote
//!
//! This crate provides the static data model shared by every other crate:
//! - Wire commands understood by the mount controller
//! - Destination address of the mount
//! - Actuator descriptors (the fixed table of switches exposed to the host)
//! - Timing parameters of the actuator control loops

pub mod command;
pub mod descriptor;
pub mod destination;
pub mod timing;

pub use command::Command;
pub use descriptor::{
    find_descriptor, ActuatorDescriptor, ActuatorKind, DescriptorError, DESCRIPTORS,
};
pub use destination::{Destination, DEFAULT_PORT};
pub use timing::Timing;
