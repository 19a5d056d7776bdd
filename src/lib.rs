// Library crate for the pulse relay server
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod presence;
pub mod room;
pub mod shared;
pub mod websockets;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use event::{RoomEvent, RoomEventHandler};
pub use presence::{PresenceConfig, PresenceTracker, RoomRegistry};
pub use room::{models::RoomModel, repository::RoomRepository, RoomCode};
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, MessageHandler, MessageType, WebSocketMessage, WebSocketRoomSubscriber,
    WebsocketReceiveHandler,
};

/// Builds the HTTP + WebSocket router with CORS restricted to `frontend_origin`
pub fn router(app_state: AppState, frontend_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/", get(|| async { "Server is running! ❤️" }))
        .route("/api/register", post(room::register_room))
        .route("/api/login", post(room::login))
        .route("/ws", get(websockets::websocket_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
