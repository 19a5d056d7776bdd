use std::sync::Arc;
use tracing::debug;

use crate::{
    event::RoomEventError,
    presence::RoomRegistry,
    room::RoomCode,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

/// Emits messages to the live members of a room
///
/// Membership is read from the registry at send time, so a message always
/// reaches whoever is connected right now.
#[derive(Clone)]
pub struct MessageBroadcaster {
    registry: Arc<RoomRegistry>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl MessageBroadcaster {
    pub fn new(registry: Arc<RoomRegistry>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            registry,
            connection_manager,
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Sends to every member of the room
    pub async fn emit_to_room(
        &self,
        room: &RoomCode,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let members = self.registry.members(room).await;
        self.send(room, &members, message).await
    }

    /// Sends to every member of the room except `sender`
    pub async fn emit_to_room_except(
        &self,
        room: &RoomCode,
        sender: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let members: Vec<String> = self
            .registry
            .members(room)
            .await
            .into_iter()
            .filter(|handle| handle != sender)
            .collect();
        self.send(room, &members, message).await
    }

    async fn send(
        &self,
        room: &RoomCode,
        handles: &[String],
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = serde_json::to_string(message).map_err(|e| {
            RoomEventError::HandlerError(format!("Failed to serialize message: {}", e))
        })?;

        self.connection_manager
            .send_to_handles(handles, &message_json)
            .await;

        debug!(
            room_code = %room,
            message_type = ?message.message_type,
            recipients = handles.len(),
            "Message emitted to room"
        );
        Ok(())
    }
}
