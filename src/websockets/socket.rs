use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// A frame worth surfacing from the client
#[derive(Debug, Clone, PartialEq)]
pub enum SocketFrame {
    Text(String),
    /// Any control frame proving the peer is still there
    Alive,
}

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Send a keepalive ping
    async fn send_ping(&mut self) -> Result<(), SocketError>;

    /// Receive the next frame from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<SocketFrame>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Handler for incoming WebSocket messages
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle an incoming text frame from the connection identified by `handle`
    async fn handle_message(&self, handle: &str, message: String);
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("No frame from peer for {0:?}")]
    PeerTimedOut(Duration),
}

/// Heartbeat policy for one connection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeepaliveConfig {
    /// How often the server pings an otherwise idle client
    pub ping_interval: Duration,
    /// Silence after which the peer is considered gone
    pub pong_timeout: Duration,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(25),
            pong_timeout: Duration::from_secs(60),
        }
    }
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn send_ping(&mut self) -> Result<(), SocketError> {
        self.send(Message::Ping(Vec::new()))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<SocketFrame>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(SocketFrame::Text(text))),
                // axum answers pings itself; both directions count as liveness
                Some(Ok(Message::Pong(_))) | Some(Ok(Message::Ping(_))) => {
                    return Ok(Some(SocketFrame::Alive))
                }
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(Message::Binary(_))) => {
                    debug!("Skipping binary WebSocket frame");
                    continue;
                }
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
                None => return Ok(None), // Connection closed
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// Connection represents one participant handle's WebSocket
///
/// Outbound frames arrive on the channel registered with the ConnectionManager;
/// inbound frames are passed to the message handler. A peer that stays silent
/// for longer than the pong timeout ends the connection with an error.
pub struct Connection {
    pub handle: String,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<String>,
    message_handler: Arc<dyn MessageHandler>,
    keepalive: KeepaliveConfig,
}

impl Connection {
    pub fn new(
        handle: String,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<String>,
        message_handler: Arc<dyn MessageHandler>,
        keepalive: KeepaliveConfig,
    ) -> Self {
        Self {
            handle,
            socket,
            outbound_receiver,
            message_handler,
            keepalive,
        }
    }

    /// Run the connection - handles both sending and receiving until disconnect
    pub async fn run(mut self) -> Result<(), SocketError> {
        let mut ping_ticker = interval_at(
            Instant::now() + self.keepalive.ping_interval,
            self.keepalive.ping_interval,
        );
        ping_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_seen = Instant::now();

        loop {
            tokio::select! {
                // Handle outbound messages (from our app to client)
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(message) => self.socket.send_message(message).await?,
                        None => break, // Channel closed, disconnect
                    }
                }

                // Handle inbound messages (from client to our app)
                msg = self.socket.receive_message() => {
                    match msg? {
                        Some(SocketFrame::Text(message)) => {
                            last_seen = Instant::now();
                            self.message_handler
                                .handle_message(&self.handle, message)
                                .await;
                        }
                        Some(SocketFrame::Alive) => last_seen = Instant::now(),
                        None => break, // Client disconnected
                    }
                }

                _ = ping_ticker.tick() => {
                    let silent_for = last_seen.elapsed();
                    if silent_for >= self.keepalive.pong_timeout {
                        warn!(
                            handle = %self.handle,
                            silent_ms = silent_for.as_millis() as u64,
                            "Peer stopped answering pings"
                        );
                        return Err(SocketError::PeerTimedOut(silent_for));
                    }
                    self.socket.send_ping().await?;
                }
            }
        }

        // Clean disconnect
        let _ = self.socket.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Clone, Copy)]
    enum AfterScript {
        /// Report a close once the inbound queue is drained
        Close,
        /// Never send another frame, as a peer that lost signal
        GoSilent,
        /// Answer with a control frame every `Duration`
        AnswerEvery(Duration),
    }

    /// Scripted socket: yields queued inbound frames, then follows `after`
    struct ScriptedSocket {
        inbound: VecDeque<String>,
        after: AfterScript,
        sent: Arc<Mutex<Vec<String>>>,
        pings: Arc<Mutex<usize>>,
    }

    impl ScriptedSocket {
        fn new(inbound: Vec<&str>, after: AfterScript) -> Self {
            Self {
                inbound: inbound.into_iter().map(String::from).collect(),
                after,
                sent: Arc::new(Mutex::new(vec![])),
                pings: Arc::new(Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl SocketWrapper for ScriptedSocket {
        async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }

        async fn send_ping(&mut self) -> Result<(), SocketError> {
            *self.pings.lock().unwrap() += 1;
            Ok(())
        }

        async fn receive_message(&mut self) -> Result<Option<SocketFrame>, SocketError> {
            if let Some(frame) = self.inbound.pop_front() {
                return Ok(Some(SocketFrame::Text(frame)));
            }
            match self.after {
                AfterScript::Close => Ok(None),
                AfterScript::GoSilent => std::future::pending().await,
                AfterScript::AnswerEvery(period) => {
                    tokio::time::sleep(period).await;
                    Ok(Some(SocketFrame::Alive))
                }
            }
        }

        async fn close(&mut self) -> Result<(), SocketError> {
            Ok(())
        }
    }

    struct RecordingHandler(Mutex<Vec<(String, String)>>);

    #[async_trait]
    impl MessageHandler for RecordingHandler {
        async fn handle_message(&self, handle: &str, message: String) {
            self.0.lock().unwrap().push((handle.to_string(), message));
        }
    }

    fn recording_handler() -> Arc<RecordingHandler> {
        Arc::new(RecordingHandler(Mutex::new(vec![])))
    }

    #[tokio::test]
    async fn test_run_passes_inbound_frames_until_close() {
        let handler = recording_handler();
        let (_tx, rx) = mpsc::unbounded_channel();
        let socket = ScriptedSocket::new(vec!["one", "two"], AfterScript::Close);

        Connection::new(
            "h1".to_string(),
            Box::new(socket),
            rx,
            handler.clone(),
            KeepaliveConfig::default(),
        )
        .run()
        .await
        .unwrap();

        let received = handler.0.lock().unwrap().clone();
        assert_eq!(
            received,
            vec![
                ("h1".to_string(), "one".to_string()),
                ("h1".to_string(), "two".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_peer_ends_connection_after_pong_timeout() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let socket = ScriptedSocket::new(vec![], AfterScript::GoSilent);
        let pings = Arc::clone(&socket.pings);
        let started = Instant::now();

        let result = Connection::new(
            "h1".to_string(),
            Box::new(socket),
            rx,
            recording_handler(),
            KeepaliveConfig {
                ping_interval: Duration::from_secs(25),
                pong_timeout: Duration::from_secs(60),
            },
        )
        .run()
        .await;

        assert!(matches!(result, Err(SocketError::PeerTimedOut(_))));
        // Pinged at 25s and 50s, gave up at the 75s tick
        assert_eq!(*pings.lock().unwrap(), 2);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(75) && elapsed < Duration::from_secs(76));
    }

    #[tokio::test(start_paused = true)]
    async fn test_answering_peer_stays_connected() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let socket = ScriptedSocket::new(vec![], AfterScript::AnswerEvery(Duration::from_secs(10)));
        let pings = Arc::clone(&socket.pings);

        let connection = Connection::new(
            "h1".to_string(),
            Box::new(socket),
            rx,
            recording_handler(),
            KeepaliveConfig::default(),
        );

        let outcome = tokio::time::timeout(Duration::from_secs(300), connection.run()).await;
        assert!(outcome.is_err(), "connection should still be running");
        assert!(*pings.lock().unwrap() >= 10);
    }

    #[tokio::test]
    async fn test_outbound_frames_are_written_to_socket() {
        let (tx, rx) = mpsc::unbounded_channel();
        let socket = ScriptedSocket::new(vec![], AfterScript::GoSilent);
        let sent = Arc::clone(&socket.sent);

        tx.send("hello".to_string()).unwrap();
        drop(tx);

        Connection::new(
            "h1".to_string(),
            Box::new(socket),
            rx,
            recording_handler(),
            KeepaliveConfig::default(),
        )
        .run()
        .await
        .unwrap();

        assert_eq!(sent.lock().unwrap().clone(), vec!["hello".to_string()]);
    }
}
