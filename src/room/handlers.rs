use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::RoomService,
    types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for registering a room
///
/// POST /api/register
#[instrument(name = "register_room", skip(state, request))]
pub async fn register_room(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let service = RoomService::new(Arc::clone(&state.room_repository));
    service.register(request).await?;

    Ok(Json(RegisterResponse { success: true }))
}

/// HTTP handler for logging into a room
///
/// POST /api/login
/// Returns the caller's letter, the room's song and its pulse count
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let service = RoomService::new(Arc::clone(&state.room_repository));
    let response = service.login(request).await?;

    info!(pulse_count = response.pulse_count, "Login successful");

    Ok(Json(response))
}
