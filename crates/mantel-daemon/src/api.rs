//! REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mantel_actuator::Actuator;
use mantel_core::{ActuatorKind, Command};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::state::AppState;

/// API error response
#[derive(Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Host-facing view of one actuator
#[derive(Debug, Clone, Serialize)]
pub struct ActuatorView {
    pub key: &'static str,
    pub entity_id: String,
    pub name: &'static str,
    pub kind: ActuatorKind,
    pub command: Command,
    pub is_on: bool,
}

impl From<&Actuator> for ActuatorView {
    fn from(actuator: &Actuator) -> Self {
        let descriptor = actuator.descriptor();
        Self {
            key: descriptor.key,
            entity_id: descriptor.entity_id(),
            name: descriptor.name,
            kind: descriptor.kind,
            command: descriptor.command,
            is_on: actuator.is_on(),
        }
    }
}

fn not_found(key: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(format!("Unknown actuator: {}", key))),
    )
        .into_response()
}

/// List all actuators
pub async fn list_actuators(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let actuators: Vec<ActuatorView> = state.actuators().iter().map(ActuatorView::from).collect();
    Json(actuators)
}

/// Get a specific actuator by key
pub async fn get_actuator(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    match state.get_actuator(&key) {
        Some(actuator) => Json(ActuatorView::from(actuator)).into_response(),
        None => not_found(&key),
    }
}

/// Switch an actuator on. The activation runs in the background; a
/// momentary pulse or a directional run outlives the request.
pub async fn turn_on(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let Some(actuator) = state.get_actuator(&key).cloned() else {
        return not_found(&key);
    };

    info!(key = %key, "Turn on requested");
    let task = actuator.clone();
    state.spawn_action(async move { task.activate().await });

    (StatusCode::ACCEPTED, Json(ActuatorView::from(&actuator))).into_response()
}

/// Switch an actuator off
pub async fn turn_off(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let Some(actuator) = state.get_actuator(&key).cloned() else {
        return not_found(&key);
    };

    info!(key = %key, "Turn off requested");
    let task = actuator.clone();
    state.spawn_action(async move { task.deactivate().await });

    (StatusCode::ACCEPTED, Json(ActuatorView::from(&actuator))).into_response()
}

/// Get the mount destination
pub async fn get_mount(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.remote.destination().clone())
}
