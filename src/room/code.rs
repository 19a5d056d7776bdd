use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Room code must not be empty")]
pub struct InvalidRoomCode;

/// Canonical, case-insensitive room identifier
///
/// The only way to build one is through `parse`, which trims and uppercases,
/// so two codes compare equal whenever their raw inputs differ only in case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    pub fn parse(raw: &str) -> Result<Self, InvalidRoomCode> {
        // Surrounding whitespace is dropped on purpose: " LOVE1 " and "love1" are the same room
        let canonical = raw.trim().to_uppercase();
        if canonical.is_empty() {
            return Err(InvalidRoomCode);
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = InvalidRoomCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}
