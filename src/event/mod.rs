// Inbound event routing between the transport and the relay handlers

// Public API - what other modules can use
pub use events::RoomEvent;
pub use room_handler::{RoomEventError, RoomEventHandler};

// Internal modules
mod events;
mod room_handler;
