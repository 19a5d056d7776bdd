use crate::room::RoomCode;
use crate::websockets::messages::PulsePoint;

/// Inbound events raised by a single connection
///
/// Room codes are already canonical by the time an event is built, so every
/// handler downstream compares rooms case-insensitively for free.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// The connection wants to be a member of a room
    JoinRoom { room_code: RoomCode },

    /// A transient point event for the partner, plus a counter increment
    SendPulse { room_code: RoomCode, point: PulsePoint },

    /// A labeled gift for everyone in the room
    SendGift { room_code: RoomCode, emoji: String },

    /// The connection closed or errored
    Disconnecting,
}

impl RoomEvent {
    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::JoinRoom { .. } => "join-room",
            RoomEvent::SendPulse { .. } => "send-pulse",
            RoomEvent::SendGift { .. } => "send-gift",
            RoomEvent::Disconnecting => "disconnecting",
        }
    }
}
