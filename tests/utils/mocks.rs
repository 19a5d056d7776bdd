use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use pulseconnect::websockets::ConnectionManager;

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Records every frame sent to each handle instead of writing to a socket
#[derive(Clone)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<String, VecDeque<String>>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get_messages_for(&self, handle: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(handle)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Pops the oldest frame sent to `handle`
    pub async fn consume_message_for(&self, handle: &str) -> Option<String> {
        self.sent_messages
            .write()
            .await
            .get_mut(handle)
            .and_then(VecDeque::pop_front)
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, _handle: String, _sender: mpsc::UnboundedSender<String>) {}

    async fn remove_connection(&self, handle: &str) {
        self.sent_messages.write().await.remove(handle);
    }

    async fn send_to_handle(&self, handle: &str, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(handle.to_string())
            .or_default()
            .push_back(message.to_string());
    }

    async fn send_to_handles(&self, handles: &[String], message: &str) {
        for handle in handles {
            self.send_to_handle(handle, message).await;
        }
    }
}
