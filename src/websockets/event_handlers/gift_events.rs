use tracing::info;

use crate::{event::RoomEventError, room::RoomCode, websockets::messages::WebSocketMessage};

use super::shared::MessageBroadcaster;

pub struct GiftEventHandlers {
    broadcaster: MessageBroadcaster,
}

impl GiftEventHandlers {
    pub fn new(broadcaster: MessageBroadcaster) -> Self {
        Self { broadcaster }
    }

    /// Relays the gift to the whole room, sender included
    pub async fn handle_gift(&self, room_code: &RoomCode, emoji: &str) -> Result<(), RoomEventError> {
        info!(room_code = %room_code, emoji = %emoji, "Handling gift event");

        self.broadcaster
            .emit_to_room(room_code, &WebSocketMessage::receive_gift(emoji.to_string()))
            .await
    }
}
