use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Outbound side of the transport: one channel per connected handle
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, handle: String, sender: mpsc::UnboundedSender<String>);

    async fn remove_connection(&self, handle: &str);

    async fn send_to_handle(&self, handle: &str, message: &str);

    async fn send_to_handles(&self, handles: &[String], message: &str);
}

pub struct InMemoryConnectionManager {
    // handle -> sender
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, handle: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(handle, sender);
    }

    async fn remove_connection(&self, handle: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(handle);
    }

    async fn send_to_handle(&self, handle: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections.get(handle) {
            // Best effort: a closed channel means the socket is already gone
            if sender.send(message.to_string()).is_err() {
                debug!(handle = %handle, "Dropped message for closed connection");
            }
        }
    }

    async fn send_to_handles(&self, handles: &[String], message: &str) {
        let connections = self.connections.read().await;
        for handle in handles {
            if let Some(sender) = connections.get(handle) {
                let _ = sender.send(message.to_string());
            }
        }
    }
}
