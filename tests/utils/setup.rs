use std::sync::Arc;
use std::time::Duration;

use pulseconnect::{
    presence::PresenceConfig,
    room::repository::{InMemoryRoomRepository, RoomRepository},
    websockets::WebsocketReceiveHandler,
    AppState, RoomCode, RoomModel,
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const ROOM_CODE: &str = "LOVE1";

pub struct TestSetup {
    pub room_repository: Arc<InMemoryRoomRepository>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub input_handler: WebsocketReceiveHandler,
}

pub struct TestSetupBuilder {
    departure_debounce: Duration,
    initial_pulse_count: u32,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            departure_debounce: Duration::from_millis(1000),
            initial_pulse_count: 0,
        }
    }

    pub fn with_departure_debounce(mut self, debounce: Duration) -> Self {
        self.departure_debounce = debounce;
        self
    }

    pub fn with_initial_pulse_count(mut self, count: u32) -> Self {
        self.initial_pulse_count = count;
        self
    }

    pub async fn build(self) -> TestSetup {
        let room_repository = Arc::new(InMemoryRoomRepository::new());
        let room_code = RoomCode::parse(ROOM_CODE).unwrap();
        room_repository
            .register_room(&RoomModel::new(
                room_code.clone(),
                "Alice".to_string(),
                "Bob".to_string(),
                "L1".to_string(),
                "L2".to_string(),
                "S".to_string(),
            ))
            .await
            .unwrap();
        for _ in 0..self.initial_pulse_count {
            room_repository
                .increment_and_get_count(&room_code)
                .await
                .unwrap();
        }

        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let app_state = AppState::new(
            room_repository.clone(),
            mock_conn_manager.clone(),
            PresenceConfig {
                departure_debounce: self.departure_debounce,
            },
        );
        let input_handler = WebsocketReceiveHandler::new(app_state.event_handler.clone());

        TestSetup {
            room_repository,
            mock_conn_manager,
            input_handler,
        }
    }
}
