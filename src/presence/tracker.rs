use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::{
    event::RoomEventError,
    room::RoomCode,
    websockets::{messages::WebSocketMessage, MessageBroadcaster},
};

/// Members needed before a room counts as "partner present"
const PARTNER_PRESENT_THRESHOLD: usize = 2;

/// Configuration for presence notifications
#[derive(Debug, Clone, Copy)]
pub struct PresenceConfig {
    /// How long to wait after a disconnect before re-checking membership.
    /// Zero re-checks immediately.
    pub departure_debounce: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            departure_debounce: Duration::from_millis(1000),
        }
    }
}

struct PendingRecheck {
    generation: u64,
    task: JoinHandle<()>,
}

/// Derives and emits the partner-present flag for each room
///
/// Joins are announced immediately to every member. Departures are debounced:
/// a per-room re-check is scheduled, and a rejoin cancels it. The re-check
/// reads live membership when it fires and only announces absence if the
/// room really dropped below two members.
#[derive(Clone)]
pub struct PresenceTracker {
    broadcaster: MessageBroadcaster,
    config: PresenceConfig,
    pending: Arc<Mutex<HashMap<RoomCode, PendingRecheck>>>,
    next_generation: Arc<AtomicU64>,
}

impl PresenceTracker {
    pub fn new(broadcaster: MessageBroadcaster, config: PresenceConfig) -> Self {
        Self {
            broadcaster,
            config,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    #[instrument(skip(self))]
    pub async fn handle_join(&self, room: &RoomCode, handle: &str) -> Result<(), RoomEventError> {
        let outcome = self.broadcaster.registry().join(room, handle).await;

        self.cancel_recheck(room).await;

        if let Some(previous_room) = outcome.previous_room {
            info!(
                from = %previous_room,
                to = %room,
                handle = %handle,
                "Handle moved between rooms"
            );
            self.schedule_recheck(previous_room).await?;
        }

        let is_partner_present = outcome.member_count >= PARTNER_PRESENT_THRESHOLD;
        info!(
            room_code = %room,
            handle = %handle,
            member_count = outcome.member_count,
            is_partner_present,
            "Handle joined room"
        );

        self.broadcaster
            .emit_to_room(room, &WebSocketMessage::update_ui(is_partner_present))
            .await
    }

    #[instrument(skip(self))]
    pub async fn handle_disconnect(&self, handle: &str) -> Result<(), RoomEventError> {
        match self.broadcaster.registry().disconnect(handle).await {
            Some((room, remaining)) => {
                info!(
                    room_code = %room,
                    handle = %handle,
                    remaining,
                    "Handle left room, scheduling presence re-check"
                );
                self.schedule_recheck(room).await
            }
            None => {
                debug!(handle = %handle, "Disconnected handle was not in any room");
                Ok(())
            }
        }
    }

    /// Number of re-checks currently waiting to fire
    pub async fn pending_rechecks(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn schedule_recheck(&self, room: RoomCode) -> Result<(), RoomEventError> {
        let delay = self.config.departure_debounce;
        if delay.is_zero() {
            return recheck(&self.broadcaster, &room).await;
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let broadcaster = self.broadcaster.clone();
        let pending = Arc::clone(&self.pending);
        let task_room = room.clone();

        // Registered before the task can observe the map
        let mut pending_guard = self.pending.lock().await;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut pending = pending.lock().await;
                match pending.get(&task_room) {
                    Some(entry) if entry.generation == generation => {
                        pending.remove(&task_room);
                    }
                    // Superseded by a newer re-check or a rejoin
                    _ => return,
                }
            }

            if let Err(e) = recheck(&broadcaster, &task_room).await {
                warn!(room_code = %task_room, error = %e, "Presence re-check failed");
            }
        });

        if let Some(stale) = pending_guard.insert(room, PendingRecheck { generation, task }) {
            stale.task.abort();
        }
        Ok(())
    }

    async fn cancel_recheck(&self, room: &RoomCode) {
        if let Some(stale) = self.pending.lock().await.remove(room) {
            stale.task.abort();
            debug!(room_code = %room, "Cancelled pending presence re-check");
        }
    }
}

async fn recheck(broadcaster: &MessageBroadcaster, room: &RoomCode) -> Result<(), RoomEventError> {
    let member_count = broadcaster.registry().count(room).await;
    if member_count >= PARTNER_PRESENT_THRESHOLD {
        debug!(room_code = %room, member_count, "Partner still present after re-check");
        return Ok(());
    }

    info!(room_code = %room, member_count, "Partner absent, notifying room");
    broadcaster
        .emit_to_room(room, &WebSocketMessage::update_ui(false))
        .await
}
