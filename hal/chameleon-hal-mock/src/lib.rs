//! Mock HAL implementation for testing Chameleon
//!
//! Every hardware capability has an in-memory stand-in here so the runtime
//! core can be driven frame by frame on the host:
//!
//! - [`MockPanel`]: records the frames and text pushed to it
//! - [`MockClock`] / [`MockDelay`]: simulated time; sleeping advances the clock
//! - [`ScriptedTouch`]: replays a queue of touch samples
//! - [`MockWifi`], [`MockTimeSource`]: settable network/time status

#![no_std]
extern crate alloc;

mod clock;
mod network;
mod panel;
mod touch;

pub use clock::{MockClock, MockDelay};
pub use network::{MockTimeSource, MockWifi};
pub use panel::{DrawnText, MockPanel};
pub use touch::ScriptedTouch;
