use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    // Client -> Server
    JoinRoom,
    SendPulse,
    SendGift,

    // Server -> Client
    UpdateUi,
    ReceivePulse,
    UpdateCount,
    ReceiveGift,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPulsePayload {
    pub room_id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendGiftPayload {
    pub room_id: String,
    pub emoji: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUiPayload {
    pub is_partner_present: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PulsePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveGiftPayload {
    pub emoji: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Create an UPDATE_UI message carrying the partner presence flag
    pub fn update_ui(is_partner_present: bool) -> Self {
        let payload = UpdateUiPayload { is_partner_present };
        Self::new(MessageType::UpdateUi, serde_json::json!(payload))
    }

    /// Create a RECEIVE_PULSE message
    pub fn receive_pulse(point: PulsePoint) -> Self {
        Self::new(MessageType::ReceivePulse, serde_json::json!(point))
    }

    /// Create an UPDATE_COUNT message; the payload is the bare count
    pub fn update_count(count: i64) -> Self {
        Self::new(MessageType::UpdateCount, serde_json::json!(count))
    }

    /// Create a RECEIVE_GIFT message
    pub fn receive_gift(emoji: String) -> Self {
        let payload = ReceiveGiftPayload { emoji };
        Self::new(MessageType::ReceiveGift, serde_json::json!(payload))
    }

    pub fn join_room(room_code: String) -> Self {
        let payload = JoinRoomPayload { room_code };
        Self::new(MessageType::JoinRoom, serde_json::json!(payload))
    }

    pub fn send_pulse(room_id: String, x: f64, y: f64) -> Self {
        let payload = SendPulsePayload { room_id, x, y };
        Self::new(MessageType::SendPulse, serde_json::json!(payload))
    }

    pub fn send_gift(room_id: String, emoji: String) -> Self {
        let payload = SendGiftPayload { room_id, emoji };
        Self::new(MessageType::SendGift, serde_json::json!(payload))
    }
}
