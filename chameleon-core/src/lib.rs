//! Board-agnostic runtime core for the Chameleon application host
//!
//! Everything between the hardware traits of `chameleon-hal` and the
//! applications themselves:
//!
//! - Event bus (synchronous publish/subscribe)
//! - Application registry and lifecycle controller
//! - Swipe navigation across the app carousel
//! - Frame scheduler with overlay and frame budget
//! - Theme provider
//! - Configuration types and the runtime context tying them together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod event;
pub mod frame;
pub mod navigation;
pub mod runtime;
pub mod theme;

pub use app::{App, AppContext, AppError, AppFramework, AppId, AppInfo, Sector};
pub use config::{ConfigError, RuntimeConfig};
pub use event::{BusError, Event, EventBus, EventHandler, EventType};
pub use frame::{FrameReport, FrameScheduler, FrameStats, Hardware};
pub use navigation::{NavCommand, Navigator};
pub use runtime::{InitError, Runtime};
pub use theme::{ColorProvider, ColorRole, ThemeError, ThemeManager, ThemeVariant};
