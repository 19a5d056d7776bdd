pub mod gift_events;
pub mod pulse_events;
pub mod shared;

pub use gift_events::GiftEventHandlers;
pub use pulse_events::PulseEventHandlers;
