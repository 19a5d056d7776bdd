use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::event::RoomEventHandler;
use crate::presence::{PresenceConfig, PresenceTracker, RoomRegistry};
use crate::room::repository::RoomRepository;
use crate::websockets::{
    ConnectionManager, KeepaliveConfig, MessageBroadcaster, WebSocketRoomSubscriber,
};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_repository: Arc<dyn RoomRepository + Send + Sync>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub event_handler: Arc<dyn RoomEventHandler>,
    pub keepalive: KeepaliveConfig,
}

impl AppState {
    /// Wires the relay core: one registry per process, shared by presence and broadcasting
    pub fn new(
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        connection_manager: Arc<dyn ConnectionManager>,
        presence_config: PresenceConfig,
    ) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let broadcaster = MessageBroadcaster::new(registry, Arc::clone(&connection_manager));
        let presence = PresenceTracker::new(broadcaster.clone(), presence_config);
        let event_handler = Arc::new(WebSocketRoomSubscriber::new(
            presence,
            broadcaster,
            Arc::clone(&room_repository),
        ));

        Self {
            room_repository,
            connection_manager,
            event_handler,
            keepalive: KeepaliveConfig::default(),
        }
    }

    pub fn with_keepalive(mut self, keepalive: KeepaliveConfig) -> Self {
        self.keepalive = keepalive;
        self
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Registration conflicts are reported as a plain rejection
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => {
                // Driver detail stays in the logs
                error!(error = %msg, "Request failed on database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
