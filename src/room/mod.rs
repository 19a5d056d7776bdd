// Public API - what other modules can use
pub use code::{InvalidRoomCode, RoomCode};
pub use handlers::{login, register_room};

// Internal modules
mod code;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
