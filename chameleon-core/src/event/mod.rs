//! Event routing
//!
//! A synchronous publish/subscribe bus connecting input, connectivity,
//! theming, and the app lifecycle.

pub mod bus;
pub mod types;

pub use bus::{BusError, EventBus, EventHandler, MAX_PUBLISH_DEPTH, MAX_SUBSCRIBERS_PER_EVENT};
pub use types::{Event, EventType, CUSTOM_EVENT_BASE, MAX_CUSTOM_EVENTS, MAX_EVENT_TYPES};
