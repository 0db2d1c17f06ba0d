//! Application framework
//!
//! Applications implement [`App`] and are registered into a fixed-size
//! [`AppFramework`]. Exactly one app is in the foreground at a time; the
//! framework brackets each foreground stay with `on_enter`/`on_exit` and
//! announces every switch on the event bus.

pub mod context;
pub mod descriptor;
pub mod framework;

pub use context::AppContext;
pub use descriptor::{App, AppId, AppInfo, Sector, MAX_APPS};
pub use framework::{AppError, AppFramework, Apps, LifecycleState};
