use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::{code::RoomCode, models::RoomModel};
use crate::shared::AppError;

/// Trait for room record persistence
///
/// This is the whole contract the relay core depends on: registration,
/// lookup, and an atomic increment-and-return of the pulse counter.
#[async_trait]
pub trait RoomRepository {
    /// Stores a new room, failing with `AppError::Conflict` if the code is taken
    async fn register_room(&self, room: &RoomModel) -> Result<(), AppError>;

    async fn lookup_room(&self, room_code: &RoomCode) -> Result<Option<RoomModel>, AppError>;

    /// Atomically increments the pulse counter and returns the new value
    async fn increment_and_get_count(&self, room_code: &RoomCode) -> Result<i64, AppError>;
}

/// In-memory implementation of RoomRepository for development and testing
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomCode, RoomModel>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self, room), fields(room_code = %room.room_code))]
    async fn register_room(&self, room: &RoomModel) -> Result<(), AppError> {
        debug!("Registering room in memory");

        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.room_code) {
            warn!("Room already exists in memory");
            return Err(AppError::Conflict("Room already exists".to_string()));
        }
        rooms.insert(room.room_code.clone(), room.clone());

        debug!("Room registered successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn lookup_room(&self, room_code: &RoomCode) -> Result<Option<RoomModel>, AppError> {
        let rooms = self.rooms.lock().await;
        let room = rooms.get(room_code).cloned();

        match &room {
            Some(_) => debug!("Room found in memory"),
            None => debug!("Room not found in memory"),
        }

        Ok(room)
    }

    #[instrument(skip(self))]
    async fn increment_and_get_count(&self, room_code: &RoomCode) -> Result<i64, AppError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_code)
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

        room.pulse_count += 1;
        debug!(pulse_count = room.pulse_count, "Pulse count incremented in memory");
        Ok(room.pulse_count)
    }
}

/// PostgreSQL implementation of room repository
pub struct PostgresRoomRepository {
    pool: PgPool,
}

impl PostgresRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the couples table if it is missing
    #[instrument(skip(self))]
    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS couples (
                room_code TEXT PRIMARY KEY,
                user_a_name TEXT NOT NULL,
                user_b_name TEXT NOT NULL,
                letter_for_a TEXT NOT NULL,
                letter_for_b TEXT NOT NULL,
                selected_song TEXT NOT NULL,
                pulse_count BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to initialize couples table");
            AppError::DatabaseError(e.to_string())
        })?;

        info!("Couples table ready");
        Ok(())
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    #[instrument(skip(self, room), fields(room_code = %room.room_code))]
    async fn register_room(&self, room: &RoomModel) -> Result<(), AppError> {
        debug!("Registering room in database");

        sqlx::query(
            "INSERT INTO couples (room_code, user_a_name, user_b_name, letter_for_a, letter_for_b, selected_song, pulse_count, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        )
        .bind(room.room_code.as_str())
        .bind(&room.user_a_name)
        .bind(&room.user_b_name)
        .bind(&room.letter_for_a)
        .bind(&room.letter_for_b)
        .bind(&room.selected_song)
        .bind(room.pulse_count)
        .bind(room.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let is_conflict = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            if is_conflict {
                warn!("Room already exists in database");
                AppError::Conflict("Room already exists".to_string())
            } else {
                warn!(error = %e, "Failed to register room in database");
                AppError::DatabaseError(e.to_string())
            }
        })?;

        debug!("Room registered successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn lookup_room(&self, room_code: &RoomCode) -> Result<Option<RoomModel>, AppError> {
        let row = sqlx::query(
            "SELECT room_code, user_a_name, user_b_name, letter_for_a, letter_for_b, selected_song, pulse_count::BIGINT AS pulse_count, created_at FROM couples WHERE room_code = $1"
        )
        .bind(room_code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch room from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let Some(row) = row else {
            debug!("Room not found in database");
            return Ok(None);
        };

        let stored_code: String = row.get("room_code");
        let room = RoomModel {
            room_code: RoomCode::parse(&stored_code)
                .map_err(|e| AppError::DatabaseError(e.to_string()))?,
            user_a_name: row.get("user_a_name"),
            user_b_name: row.get("user_b_name"),
            letter_for_a: row.get("letter_for_a"),
            letter_for_b: row.get("letter_for_b"),
            selected_song: row.get("selected_song"),
            pulse_count: row.get("pulse_count"),
            created_at: row.get("created_at"),
        };
        debug!("Room found in database");
        Ok(Some(room))
    }

    #[instrument(skip(self))]
    async fn increment_and_get_count(&self, room_code: &RoomCode) -> Result<i64, AppError> {
        let row = sqlx::query(
            "UPDATE couples SET pulse_count = pulse_count + 1 WHERE room_code = $1 RETURNING pulse_count::BIGINT AS pulse_count",
        )
        .bind(room_code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to increment pulse count");
            AppError::DatabaseError(e.to_string())
        })?;

        let pulse_count: i64 = row
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?
            .get("pulse_count");
        debug!(pulse_count = pulse_count, "Pulse count incremented in database");
        Ok(pulse_count)
    }
}
