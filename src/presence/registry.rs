use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

use crate::room::RoomCode;

/// Result of adding a handle to a room
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// Members of the joined room, including the new handle
    pub member_count: usize,
    /// Room the handle was moved out of, if it was elsewhere
    pub previous_room: Option<RoomCode>,
}

#[derive(Default)]
struct RegistryState {
    // room -> connected handles
    rooms: HashMap<RoomCode, HashSet<String>>,
    // handle -> room (single-room membership)
    memberships: HashMap<String, RoomCode>,
}

/// In-memory map of rooms to the handles currently connected to them
///
/// This is the single source of truth for who is present. It is constructed
/// once and shared by the presence tracker and the broadcaster.
#[derive(Default)]
pub struct RoomRegistry {
    state: RwLock<RegistryState>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handle` to `room`, moving it out of any other room first
    pub async fn join(&self, room: &RoomCode, handle: &str) -> JoinOutcome {
        let mut state = self.state.write().await;

        let previous_room = match state.memberships.get(handle) {
            Some(current) if current == room => None,
            Some(current) => Some(current.clone()),
            None => None,
        };
        if let Some(previous) = &previous_room {
            remove_member(&mut state, previous, handle);
        }

        state.memberships.insert(handle.to_string(), room.clone());
        let members = state.rooms.entry(room.clone()).or_default();
        members.insert(handle.to_string());
        let member_count = members.len();

        debug!(room_code = %room, handle = %handle, member_count, "Handle joined room");

        JoinOutcome {
            member_count,
            previous_room,
        }
    }

    /// Removes `handle` from `room` and returns how many members remain
    pub async fn leave(&self, room: &RoomCode, handle: &str) -> usize {
        let mut state = self.state.write().await;
        if state.memberships.get(handle) == Some(room) {
            state.memberships.remove(handle);
        }
        remove_member(&mut state, room, handle)
    }

    /// Removes `handle` from whichever room it is in
    ///
    /// Returns that room and its remaining member count, or `None` if the
    /// handle never joined a room.
    pub async fn disconnect(&self, handle: &str) -> Option<(RoomCode, usize)> {
        let mut state = self.state.write().await;
        let room = state.memberships.remove(handle)?;
        let remaining = remove_member(&mut state, &room, handle);

        debug!(room_code = %room, handle = %handle, remaining, "Handle disconnected");
        Some((room, remaining))
    }

    pub async fn count(&self, room: &RoomCode) -> usize {
        self.state
            .read()
            .await
            .rooms
            .get(room)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    pub async fn members(&self, room: &RoomCode) -> Vec<String> {
        self.state
            .read()
            .await
            .rooms
            .get(room)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn room_of(&self, handle: &str) -> Option<RoomCode> {
        self.state.read().await.memberships.get(handle).cloned()
    }
}

fn remove_member(state: &mut RegistryState, room: &RoomCode, handle: &str) -> usize {
    let Some(members) = state.rooms.get_mut(room) else {
        return 0;
    };
    members.remove(handle);
    let remaining = members.len();
    if remaining == 0 {
        state.rooms.remove(room);
    }
    remaining
}
