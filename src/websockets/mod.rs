// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use event_handlers::shared::MessageBroadcaster;
pub use handler::{parse_room_event, websocket_handler, InboundError, WebsocketReceiveHandler};
pub use messages::{MessageType, PulsePoint, WebSocketMessage};
pub use socket::{KeepaliveConfig, MessageHandler};
pub use websocket_room_subscriber::WebSocketRoomSubscriber;

// Internal modules
mod connection_manager;
pub mod event_handlers;
mod handler;
pub mod messages;
mod socket;
mod websocket_room_subscriber;
