use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::code::RoomCode;

/// Database model for the couples table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomModel {
    pub room_code: RoomCode,
    pub user_a_name: String,
    pub user_b_name: String,
    pub letter_for_a: String,
    pub letter_for_b: String,
    pub selected_song: String,
    pub pulse_count: i64,
    pub created_at: DateTime<Utc>,
}

impl RoomModel {
    /// Creates a freshly registered room; the pulse counter starts at zero
    pub fn new(
        room_code: RoomCode,
        user_a_name: String,
        user_b_name: String,
        letter_for_a: String,
        letter_for_b: String,
        selected_song: String,
    ) -> Self {
        Self {
            room_code,
            user_a_name,
            user_b_name,
            letter_for_a,
            letter_for_b,
            selected_song,
            pulse_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Picks the letter written for `name`.
    ///
    /// Only user A is matched (case-insensitively); every other name gets
    /// the letter written for user B.
    pub fn letter_for(&self, name: &str) -> &str {
        if name.to_lowercase() == self.user_a_name.to_lowercase() {
            &self.letter_for_a
        } else {
            &self.letter_for_b
        }
    }
}
