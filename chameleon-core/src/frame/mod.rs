//! Frame loop
//!
//! The scheduler owns the hardware and drives the runtime at a fixed rate;
//! the overlay draws the host chrome over the active app.

pub mod overlay;
pub mod scheduler;
pub mod stats;

pub use overlay::{visible_window, Overlay};
pub use scheduler::{FrameReport, FrameScheduler, Hardware};
pub use stats::FrameStats;
