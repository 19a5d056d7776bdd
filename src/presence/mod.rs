// Room membership and the partner-present signal derived from it

pub use registry::{JoinOutcome, RoomRegistry};
pub use tracker::{PresenceConfig, PresenceTracker};

mod registry;
mod tracker;
