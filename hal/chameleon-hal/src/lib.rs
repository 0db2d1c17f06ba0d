//! Chameleon Hardware Access Layer
//!
//! Traits the runtime core calls synchronously to reach the hardware,
//! implemented per board (and by `chameleon-hal-mock` for tests).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  chameleon-core / chameleon-apps        │
//! └─────────────────────────────────────────┘
//!                     │  DisplayHal, TouchInput, WifiHal, TimeSource, Clock
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chameleon-hal (this crate)             │
//! │  BufferedDisplay ──▶ Panel              │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ board drivers │       │ chameleon-    │
//! │ (TFT, touch)  │       │   hal-mock    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! All polling operations are non-blocking by contract.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod buffered;
pub mod color;
pub mod display;
pub mod geometry;
pub mod time;
pub mod touch;
pub mod wifi;

// Re-export key types at crate root for convenience
pub use buffered::BufferedDisplay;
pub use color::Rgb565;
pub use display::{DisplayExt, DisplayHal, Panel};
pub use geometry::{Geometry, Rect, WAVESHARE_320X172};
pub use time::{Clock, TimeError, TimeSource};
pub use touch::{TouchError, TouchInput, TouchSample};
pub use wifi::{WifiError, WifiHal, WifiStatus};
