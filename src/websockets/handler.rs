use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::{RoomEvent, RoomEventHandler};
use crate::room::{InvalidRoomCode, RoomCode};
use crate::shared::AppState;
use crate::websockets::messages::{
    JoinRoomPayload, MessageType, PulsePoint, SendGiftPayload, SendPulsePayload, WebSocketMessage,
};

use super::socket::{Connection, MessageHandler, SocketWrapper};

/// Why an inbound frame could not be turned into a room event
#[derive(Debug, Error)]
pub enum InboundError {
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported message type: {0:?}")]
    UnsupportedType(MessageType),

    #[error(transparent)]
    InvalidRoomCode(#[from] InvalidRoomCode),
}

/// Parses one inbound text frame into a room event
pub fn parse_room_event(message: &str) -> Result<RoomEvent, InboundError> {
    let ws_message: WebSocketMessage = serde_json::from_str(message)?;

    match ws_message.message_type {
        MessageType::JoinRoom => {
            let payload: JoinRoomPayload = decode_payload(ws_message.payload)?;
            Ok(RoomEvent::JoinRoom {
                room_code: RoomCode::parse(&payload.room_code)?,
            })
        }
        MessageType::SendPulse => {
            let payload: SendPulsePayload = decode_payload(ws_message.payload)?;
            Ok(RoomEvent::SendPulse {
                room_code: RoomCode::parse(&payload.room_id)?,
                point: PulsePoint {
                    x: payload.x,
                    y: payload.y,
                },
            })
        }
        MessageType::SendGift => {
            let payload: SendGiftPayload = decode_payload(ws_message.payload)?;
            Ok(RoomEvent::SendGift {
                room_code: RoomCode::parse(&payload.room_id)?,
                emoji: payload.emoji,
            })
        }
        other => Err(InboundError::UnsupportedType(other)),
    }
}

fn decode_payload<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, InboundError> {
    Ok(serde_json::from_value(value)?)
}

/// Message handler for receiving WebSocket messages from the client
///
/// Bad frames and handler failures are logged and dropped; the connection
/// stays up.
pub struct WebsocketReceiveHandler {
    event_handler: Arc<dyn RoomEventHandler>,
}

impl WebsocketReceiveHandler {
    pub fn new(event_handler: Arc<dyn RoomEventHandler>) -> Self {
        Self { event_handler }
    }

    /// Raise the disconnect event for a handle whose socket is gone
    pub async fn handle_disconnect(&self, handle: &str) {
        self.dispatch(handle, RoomEvent::Disconnecting).await;
    }

    async fn dispatch(&self, handle: &str, event: RoomEvent) {
        let event_type = event.event_type();
        if let Err(e) = self.event_handler.handle_room_event(handle, event).await {
            warn!(
                handle = %handle,
                event_type,
                handler = self.event_handler.handler_name(),
                error = %e,
                "Room event handler failed"
            );
        }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, handle: &str, message: String) {
        debug!(handle = %handle, message = %message, "Received message");

        match parse_room_event(&message) {
            Ok(event) => self.dispatch(handle, event).await,
            Err(e) => {
                warn!(
                    handle = %handle,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
            }
        }
    }
}

/// WebSocket endpoint
/// GET /ws - every upgraded socket becomes a fresh participant handle
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let handle = Uuid::new_v4().to_string();
    info!(handle = %handle, "WebSocket connection established");

    serve_connection(handle, Box::new(socket), app_state).await;
}

/// Runs one participant's socket to completion, then tears its membership down
async fn serve_connection(handle: String, socket: Box<dyn SocketWrapper>, app_state: AppState) {
    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(handle.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(WebsocketReceiveHandler::new(Arc::clone(
        &app_state.event_handler,
    )));

    let connection = Connection::new(
        handle.clone(),
        socket,
        outbound_receiver,
        message_handler.clone(),
        app_state.keepalive,
    );

    // Run the connection until disconnect or keepalive timeout
    match connection.run().await {
        Ok(()) => info!(handle = %handle, "WebSocket connection closed cleanly"),
        Err(e) => warn!(handle = %handle, error = %e, "WebSocket connection error"),
    }

    // Cleanup: stop routing frames to the handle, then let presence react
    app_state
        .connection_manager
        .remove_connection(&handle)
        .await;
    message_handler.handle_disconnect(&handle).await;

    info!(handle = %handle, "WebSocket disconnect handled");
}
