//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use pulseconnect::websockets::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    handles: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    pub fn for_handles(setup: &'a TestSetup, handles: Vec<&'a str>) -> Self {
        Self { setup, handles }
    }

    /// Assert that every handle's next frame has the given type (consumes it)
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for handle in &self.handles {
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(handle)
                .await;
            assert!(
                message.is_some(),
                "{} should have received a message",
                handle
            );

            let msg: WebSocketMessage = serde_json::from_str(&message.unwrap()).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type",
                handle
            );
            messages.push(msg);
        }

        let first_payload = &messages[0].payload;
        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                &msg.payload, first_payload,
                "{} payload differs from {}",
                self.handles[i], self.handles[0]
            );
        }

        MessageContent {
            payload: messages[0].payload.clone(),
        }
    }

    /// Assert that the handles have no pending frames
    pub async fn received_no_messages(self) {
        for handle in &self.handles {
            let messages = self.setup.mock_conn_manager.get_messages_for(handle).await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                handle,
                messages
            );
        }
    }
}

/// Payloads of every pending frame of `msg_type` sent to `handle` (non-consuming)
pub async fn payloads_of_type(
    setup: &TestSetup,
    handle: &str,
    msg_type: MessageType,
) -> Vec<serde_json::Value> {
    setup
        .mock_conn_manager
        .get_messages_for(handle)
        .await
        .iter()
        .filter_map(|frame| serde_json::from_str::<WebSocketMessage>(frame).ok())
        .filter(|msg| msg.message_type == msg_type)
        .map(|msg| msg.payload)
        .collect()
}

/// Presence flags sent to `handle`, oldest first
pub async fn presence_flags(setup: &TestSetup, handle: &str) -> Vec<bool> {
    payloads_of_type(setup, handle, MessageType::UpdateUi)
        .await
        .iter()
        .filter_map(|payload| payload["isPartnerPresent"].as_bool())
        .collect()
}

/// Counts sent to `handle`, in arrival order
pub async fn counts(setup: &TestSetup, handle: &str) -> Vec<i64> {
    payloads_of_type(setup, handle, MessageType::UpdateCount)
        .await
        .iter()
        .filter_map(serde_json::Value::as_i64)
        .collect()
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    payload: serde_json::Value,
}

impl MessageContent {
    pub fn with_partner_present(self, expected: bool) -> Self {
        assert_eq!(self.payload["isPartnerPresent"], expected);
        self
    }

    pub fn with_point(self, x: f64, y: f64) -> Self {
        assert_eq!(self.payload["x"], x);
        assert_eq!(self.payload["y"], y);
        self
    }

    pub fn with_count(self, expected: i64) -> Self {
        assert_eq!(self.payload, expected);
        self
    }

    pub fn with_emoji(self, expected: &str) -> Self {
        assert_eq!(self.payload["emoji"], expected);
        self
    }
}
