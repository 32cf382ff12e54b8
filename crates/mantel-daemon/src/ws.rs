//! WebSocket handler for real-time state updates

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use mantel_actuator::StateChange;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::api::ActuatorView;
use crate::state::AppState;

/// WebSocket message types
#[derive(Serialize)]
#[serde(tag = "type", content = "data")]
enum WsMessage {
    #[serde(rename = "actuator")]
    Actuator(ActuatorView),
    #[serde(rename = "state_changed")]
    StateChanged(StateChange),
    #[serde(rename = "pong")]
    Pong,
}

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut changes = state.subscribe();

    info!("WebSocket client connected");

    // Send current actuator states on connect
    for actuator in state.actuators() {
        let msg = WsMessage::Actuator(ActuatorView::from(actuator));
        if let Ok(json) = serde_json::to_string(&msg) {
            if sender.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
    }

    loop {
        tokio::select! {
            // Forward state changes to client
            change = changes.recv() => {
                match change {
                    Ok(change) => {
                        if let Ok(json) = serde_json::to_string(&WsMessage::StateChanged(change)) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "State change channel lagged");
                    }
                    Err(RecvError::Closed) => {
                        debug!("State change channel closed");
                        break;
                    }
                }
            }

            // Handle incoming messages from client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        if text.as_str() == "ping" {
                            if let Ok(pong) = serde_json::to_string(&WsMessage::Pong) {
                                if sender.send(Message::Text(pong.into())).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("WebSocket client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use mantel_core::find_descriptor;

    #[test]
    fn test_state_changed_message_shape() {
        let change = StateChange::new(find_descriptor("down").unwrap(), true);
        let json = serde_json::to_value(WsMessage::StateChanged(change)).unwrap();

        assert_eq!(json["type"], "state_changed");
        assert_eq!(json["data"]["key"], "down");
        assert_eq!(json["data"]["entity_id"], "switch.mantel_mount_down");
        assert_eq!(json["data"]["is_on"], true);
    }

    #[test]
    fn test_pong_message_shape() {
        let json = serde_json::to_value(WsMessage::Pong).unwrap();
        assert_eq!(json["type"], "pong");
    }
}
