//! Home dashboard, the app shown at boot

use core::fmt::Write;

use chameleon_core::app::{App, AppContext, AppInfo, Sector};
use chameleon_core::theme::ColorRole;
use chameleon_hal::DisplayExt;
use heapless::String;

use crate::catalog::CATALOG_LEN;

/// Welcome screen with a running frame counter
#[derive(Debug, Default)]
pub struct HomeApp {
    visits: u32,
}

impl HomeApp {
    pub const fn new() -> Self {
        Self { visits: 0 }
    }

    /// Times the app has been entered
    pub fn visits(&self) -> u32 {
        self.visits
    }
}

impl App for HomeApp {
    fn info(&self) -> AppInfo {
        AppInfo::new("Home", "home", Sector::Productivity)
    }

    fn init(&mut self) {
        debug!("Home app initialized");
    }

    fn on_enter(&mut self) {
        self.visits += 1;
        debug!("Entering home screen");
    }

    fn on_update(&mut self, ctx: &mut AppContext<'_, '_>) {
        let primary = ctx.color(ColorRole::Primary);
        let foreground = ctx.color(ColorRole::Foreground);

        ctx.display.draw_text_centered(40, "Chameleon OS", primary, 2);
        ctx.display
            .draw_text_centered(70, "Universal Embedded OS", foreground, 1);

        let mut line: String<32> = String::new();
        if write!(line, "{} Apps in One Device", CATALOG_LEN).is_ok() {
            ctx.display.draw_text_centered(90, &line, foreground, 1);
        }

        line.clear();
        if write!(line, "Frame: {}", ctx.display.frame_count()).is_ok() {
            ctx.display.draw_text(10, 110, &line, foreground, 1);
        }
    }

    fn on_exit(&mut self) {
        debug!("Exiting home screen");
    }
}
