use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::{
    event::{RoomEvent, RoomEventError, RoomEventHandler},
    presence::PresenceTracker,
    room::repository::RoomRepository,
};

use super::event_handlers::{shared::MessageBroadcaster, GiftEventHandlers, PulseEventHandlers};

/// WebSocket-specific room event handler
///
/// Handles room events by delegating to specialized handlers:
/// - PresenceTracker: JoinRoom, Disconnecting
/// - PulseEventHandlers: SendPulse
/// - GiftEventHandlers: SendGift
pub struct WebSocketRoomSubscriber {
    presence: PresenceTracker,
    pulse_handlers: PulseEventHandlers,
    gift_handlers: GiftEventHandlers,
}

impl WebSocketRoomSubscriber {
    pub fn new(
        presence: PresenceTracker,
        broadcaster: MessageBroadcaster,
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
    ) -> Self {
        Self {
            presence,
            pulse_handlers: PulseEventHandlers::new(broadcaster.clone(), room_repository),
            gift_handlers: GiftEventHandlers::new(broadcaster),
        }
    }
}

#[async_trait]
impl RoomEventHandler for WebSocketRoomSubscriber {
    async fn handle_room_event(
        &self,
        handle: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        debug!(
            handle = %handle,
            event_type = event.event_type(),
            "Handling room event for WebSocket connections"
        );

        match event {
            RoomEvent::JoinRoom { room_code } => self.presence.handle_join(&room_code, handle).await,
            RoomEvent::SendPulse { room_code, point } => {
                // The counter update runs on its own; its outcome is logged there
                self.pulse_handlers
                    .handle_pulse(&room_code, handle, point)
                    .await
                    .map(|_count_task| ())
            }
            RoomEvent::SendGift { room_code, emoji } => {
                self.gift_handlers.handle_gift(&room_code, &emoji).await
            }
            RoomEvent::Disconnecting => self.presence.handle_disconnect(handle).await,
        }
    }

    fn handler_name(&self) -> &'static str {
        "WebSocketRoomSubscriber"
    }
}
