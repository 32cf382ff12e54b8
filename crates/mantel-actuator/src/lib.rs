//! Mantel Actuator - Actuator control core
//!
//! Turns on/off requests from the host into correctly sequenced command
//! traffic:
//! - Momentary actuators fire a burst and reset themselves
//! - Directional actuators repeat their command while held, with debounce,
//!   cooperative cancellation, and an auto-stop safety cutoff
//! - The registry builds one actuator per descriptor for a mount

pub mod directional;
pub mod listener;
pub mod momentary;
pub mod registry;
pub mod remote;

#[cfg(test)]
mod testing;

pub use directional::DirectionalActuator;
pub use listener::{StateChange, StateListener};
pub use momentary::MomentaryActuator;
pub use registry::{build_actuators, Actuator};
pub use remote::MountRemote;
