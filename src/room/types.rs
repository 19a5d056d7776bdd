use serde::{Deserialize, Serialize};

/// Request payload for registering a new room
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub room_code: String,
    pub user_a: String,
    pub user_b: String,
    pub letter_a: String,
    pub letter_b: String,
    pub song: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub success: bool,
}

/// Request payload for logging into a room
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub room_code: String,
    pub my_name: String,
}

/// What a participant sees after login: their own letter, the song and the running total
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub letter: String,
    pub song: String,
    pub pulse_count: i64,
}
