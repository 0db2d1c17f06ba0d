//! Title card for catalog apps without an implementation yet

use chameleon_core::app::{App, AppContext, AppInfo};
use chameleon_core::theme::ColorRole;
use chameleon_hal::DisplayExt;

use crate::catalog::CatalogEntry;

/// Shows the app name and its tagline
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderApp {
    entry: &'static CatalogEntry,
}

impl PlaceholderApp {
    pub const fn new(entry: &'static CatalogEntry) -> Self {
        Self { entry }
    }

    pub fn entry(&self) -> &'static CatalogEntry {
        self.entry
    }
}

impl App for PlaceholderApp {
    fn info(&self) -> AppInfo {
        self.entry.info
    }

    fn on_update(&mut self, ctx: &mut AppContext<'_, '_>) {
        let primary = ctx.color(ColorRole::Primary);
        let foreground = ctx.color(ColorRole::Foreground);
        ctx.display
            .draw_text_centered(50, self.entry.info.name, primary, 2);
        ctx.display
            .draw_text_centered(80, self.entry.tagline, foreground, 1);
    }
}
