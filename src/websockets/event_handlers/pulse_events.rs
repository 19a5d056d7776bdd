use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    event::RoomEventError,
    room::{repository::RoomRepository, RoomCode},
    websockets::messages::{PulsePoint, WebSocketMessage},
};

use super::shared::MessageBroadcaster;

pub struct PulseEventHandlers {
    broadcaster: MessageBroadcaster,
    room_repository: Arc<dyn RoomRepository + Send + Sync>,
}

impl PulseEventHandlers {
    pub fn new(
        broadcaster: MessageBroadcaster,
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
    ) -> Self {
        Self {
            broadcaster,
            room_repository,
        }
    }

    /// Forwards the pulse to the partner, then updates the counter in the background.
    ///
    /// The forward never waits on the counter. The returned task resolves once
    /// the new count has been broadcast to the whole room, or the increment
    /// failed and was logged.
    pub async fn handle_pulse(
        &self,
        room_code: &RoomCode,
        sender: &str,
        point: PulsePoint,
    ) -> Result<JoinHandle<()>, RoomEventError> {
        debug!(
            room_code = %room_code,
            sender = %sender,
            x = point.x,
            y = point.y,
            "Handling pulse event"
        );

        if let Err(e) = self
            .broadcaster
            .emit_to_room_except(room_code, sender, &WebSocketMessage::receive_pulse(point))
            .await
        {
            warn!(room_code = %room_code, error = %e, "Pulse forward failed");
        }

        let broadcaster = self.broadcaster.clone();
        let room_repository = Arc::clone(&self.room_repository);
        let room_code = room_code.clone();

        Ok(tokio::spawn(async move {
            let count = match room_repository.increment_and_get_count(&room_code).await {
                Ok(count) => count,
                Err(e) => {
                    error!(room_code = %room_code, error = %e, "Pulse update failed");
                    return;
                }
            };

            info!(room_code = %room_code, pulse_count = count, "Pulse counted");

            if let Err(e) = broadcaster
                .emit_to_room(&room_code, &WebSocketMessage::update_count(count))
                .await
            {
                warn!(room_code = %room_code, error = %e, "Count broadcast failed");
            }
        }))
    }
}
