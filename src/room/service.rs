use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    code::RoomCode,
    models::RoomModel,
    repository::RoomRepository,
    types::{LoginRequest, LoginResponse, RegisterRequest},
};
use crate::shared::AppError;

/// Service for room registration and login
pub struct RoomService {
    repository: Arc<dyn RoomRepository + Send + Sync>,
}

impl RoomService {
    pub fn new(repository: Arc<dyn RoomRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, request), fields(room_code = %request.room_code))]
    pub async fn register(&self, request: RegisterRequest) -> Result<(), AppError> {
        let room_code = parse_code(&request.room_code)?;

        let room = RoomModel::new(
            room_code,
            request.user_a,
            request.user_b,
            request.letter_a,
            request.letter_b,
            request.song,
        );
        self.repository.register_room(&room).await?;

        info!(room_code = %room.room_code, "Room registered");
        Ok(())
    }

    #[instrument(skip(self, request), fields(room_code = %request.room_code))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let room_code = parse_code(&request.room_code)?;

        let room = self
            .repository
            .lookup_room(&room_code)
            .await?
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

        debug!(room_code = %room_code, "Room found for login");

        Ok(LoginResponse {
            letter: room.letter_for(&request.my_name).to_string(),
            song: room.selected_song.clone(),
            pulse_count: room.pulse_count,
        })
    }
}

fn parse_code(raw: &str) -> Result<RoomCode, AppError> {
    RoomCode::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}
