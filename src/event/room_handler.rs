use async_trait::async_trait;
use thiserror::Error;

use super::events::RoomEvent;

/// Errors that can occur when handling room events
#[derive(Debug, Error)]
pub enum RoomEventError {
    #[error("Handler error: {0}")]
    HandlerError(String),
}

/// Trait for components that react to events raised by a connection
#[async_trait]
pub trait RoomEventHandler: Send + Sync {
    /// Handle an event raised by the connection identified by `handle`
    async fn handle_room_event(&self, handle: &str, event: RoomEvent)
        -> Result<(), RoomEventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}
