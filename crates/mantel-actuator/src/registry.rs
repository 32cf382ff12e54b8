//! Actuator registry: one actuator instance per descriptor

use mantel_core::{ActuatorDescriptor, ActuatorKind, Destination, Timing};
use std::sync::Arc;
use tracing::debug;

use crate::directional::DirectionalActuator;
use crate::listener::StateListener;
use crate::momentary::MomentaryActuator;

/// The capability every actuator offers the host: activate, deactivate, is_on
#[derive(Clone)]
pub enum Actuator {
    Momentary(MomentaryActuator),
    Directional(DirectionalActuator),
}

impl Actuator {
    /// Build the actuator matching the descriptor's kind
    pub fn new(
        descriptor: &'static ActuatorDescriptor,
        destination: Destination,
        timing: Timing,
        listener: Arc<dyn StateListener>,
    ) -> Self {
        match descriptor.kind {
            ActuatorKind::Momentary => Self::Momentary(MomentaryActuator::new(
                descriptor,
                destination,
                timing,
                listener,
            )),
            ActuatorKind::Directional => Self::Directional(DirectionalActuator::new(
                descriptor,
                destination,
                timing,
                listener,
            )),
        }
    }

    pub fn descriptor(&self) -> &'static ActuatorDescriptor {
        match self {
            Self::Momentary(a) => a.descriptor(),
            Self::Directional(a) => a.descriptor(),
        }
    }

    pub fn key(&self) -> &'static str {
        self.descriptor().key
    }

    pub fn is_on(&self) -> bool {
        match self {
            Self::Momentary(a) => a.is_on(),
            Self::Directional(a) => a.is_on(),
        }
    }

    pub async fn activate(&self) {
        match self {
            Self::Momentary(a) => a.activate().await,
            Self::Directional(a) => a.activate().await,
        }
    }

    pub async fn deactivate(&self) {
        match self {
            Self::Momentary(a) => a.deactivate().await,
            Self::Directional(a) => a.deactivate().await,
        }
    }

    /// Switch off and wait for traffic still in flight
    pub async fn shutdown(&self) {
        match self {
            Self::Momentary(a) => a.deactivate().await,
            Self::Directional(a) => a.shutdown().await,
        }
    }
}

/// Build one actuator per descriptor, all aimed at the same destination
pub fn build_actuators<I>(
    destination: &Destination,
    descriptors: I,
    timing: Timing,
    listener: Arc<dyn StateListener>,
) -> Vec<Actuator>
where
    I: IntoIterator<Item = &'static ActuatorDescriptor>,
{
    let actuators: Vec<Actuator> = descriptors
        .into_iter()
        .map(|d| Actuator::new(d, destination.clone(), timing, listener.clone()))
        .collect();

    debug!(
        dest = %destination,
        count = actuators.len(),
        "Built actuators"
    );
    actuators
}
