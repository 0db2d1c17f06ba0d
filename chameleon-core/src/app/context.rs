//! Per-frame view of the host handed to the active application

use chameleon_hal::{DisplayHal, Rgb565, TimeSource, WifiHal};

use super::descriptor::AppId;
use crate::event::EventBus;
use crate::theme::{ColorProvider, ColorRole};

/// What an application can reach during `on_update`
///
/// Apps draw into `display`, read colors through `theme`, and may publish
/// on `bus`. Switching apps from inside a hook is not allowed; instead an
/// app calls [`request_switch`](Self::request_switch) and the scheduler
/// applies it once the update returns.
pub struct AppContext<'c, 'h> {
    pub display: &'c mut dyn DisplayHal,
    pub theme: &'c dyn ColorProvider,
    pub bus: &'c EventBus<'h>,
    pub wifi: &'c dyn WifiHal,
    pub time: &'c dyn TimeSource,
    /// Frame number, starting at 0
    pub frame: u32,
    /// Milliseconds since boot at the start of the frame
    pub now_ms: u32,
    switch_request: Option<AppId>,
}

impl<'c, 'h> AppContext<'c, 'h> {
    pub fn new(
        display: &'c mut dyn DisplayHal,
        theme: &'c dyn ColorProvider,
        bus: &'c EventBus<'h>,
        wifi: &'c dyn WifiHal,
        time: &'c dyn TimeSource,
    ) -> Self {
        Self {
            display,
            theme,
            bus,
            wifi,
            time,
            frame: 0,
            now_ms: 0,
            switch_request: None,
        }
    }

    /// Set frame number and timestamp
    pub fn at_frame(mut self, frame: u32, now_ms: u32) -> Self {
        self.frame = frame;
        self.now_ms = now_ms;
        self
    }

    /// Shorthand for `theme.color(role)`
    pub fn color(&self, role: ColorRole) -> Rgb565 {
        self.theme.color(role)
    }

    /// Ask the host to switch to `id` after this frame's update
    ///
    /// A later request in the same frame replaces an earlier one.
    pub fn request_switch(&mut self, id: AppId) {
        self.switch_request = Some(id);
    }

    /// Pending switch request, if any
    pub fn switch_request(&self) -> Option<AppId> {
        self.switch_request
    }
}
