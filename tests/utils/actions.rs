use tokio::time::{sleep, Duration};

use pulseconnect::websockets::{MessageHandler, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Deliver a raw text frame from `handle` without waiting
    pub async fn send_raw(&self, handle: &str, frame: &str) {
        self.input_handler
            .handle_message(handle, frame.to_string())
            .await;
    }

    /// Send a WebSocket message and wait for processing
    pub async fn send_message(&self, handle: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.send_raw(handle, &message_json).await;
        sleep(Duration::from_millis(10)).await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn join(&self, handle: &str, room_code: &str) {
        self.send_message(handle, WebSocketMessage::join_room(room_code.to_string()))
            .await;
    }

    pub async fn send_pulse(&self, handle: &str, room_code: &str, x: f64, y: f64) {
        self.send_message(
            handle,
            WebSocketMessage::send_pulse(room_code.to_string(), x, y),
        )
        .await;
    }

    pub async fn send_gift(&self, handle: &str, room_code: &str, emoji: &str) {
        self.send_message(
            handle,
            WebSocketMessage::send_gift(room_code.to_string(), emoji.to_string()),
        )
        .await;
    }

    /// Simulate the socket of `handle` going away
    pub async fn disconnect(&self, handle: &str) {
        self.input_handler.handle_disconnect(handle).await;
    }
}
