//! Status bar and carousel position dots drawn over every app

use core::fmt::Write;
use core::ops::Range;

use chameleon_hal::{DisplayExt, DisplayHal};
use heapless::String;

use crate::app::AppFramework;
use crate::config::OverlayConfig;
use crate::theme::{ColorProvider, ColorRole};

/// Text inset from the top-left of the status bar
const NAME_X: i32 = 10;
const TEXT_Y: i32 = 5;

/// Counter position, measured from the right edge
const COUNTER_INSET: i32 = 60;

/// Host chrome renderer
#[derive(Debug, Clone)]
pub struct Overlay {
    config: OverlayConfig,
}

impl Overlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Clear the back buffer to the theme background
    pub fn begin_frame(&self, display: &mut dyn DisplayHal, theme: &dyn ColorProvider) {
        display.clear(theme.color(ColorRole::Background));
    }

    /// Draw the status bar and the dot row
    pub fn render(&self, display: &mut dyn DisplayHal, theme: &dyn ColorProvider, apps: &AppFramework<'_>) {
        let geometry = display.geometry();
        let width = geometry.width as i32;

        display.draw_rect(
            0,
            0,
            width,
            self.config.status_bar_height as i32,
            theme.color(ColorRole::Primary),
        );

        let foreground = theme.color(ColorRole::Foreground);
        if let Some(id) = apps.current() {
            if let Some(info) = apps.info(id) {
                display.draw_text(NAME_X, TEXT_Y, info.name, foreground, 1);
            }
            let mut counter: String<12> = String::new();
            if write!(counter, "{}/{}", id.index() + 1, apps.count()).is_ok() {
                display.draw_text(width - COUNTER_INSET, TEXT_Y, &counter, foreground, 1);
            }
        }

        let count = apps.count();
        if count == 0 {
            return;
        }

        let current = apps.current().map(|id| id.index());
        let window = visible_window(count, current, self.config.max_dots as usize);
        let spacing = self.config.dot_spacing as i32;
        let visible = window.len() as i32;
        let start_x = (width - visible * spacing) / 2 + spacing / 2;
        let y = geometry.effective_height() as i32 - self.config.dot_offset as i32;
        let primary = theme.color(ColorRole::Primary);

        for (slot, index) in window.enumerate() {
            let x = start_x + slot as i32 * spacing;
            if Some(index) == current {
                display.fill_circle(x, y, self.config.active_dot_radius as i32, primary);
            } else {
                display.fill_circle(x, y, self.config.dot_radius as i32, foreground);
            }
        }
    }
}

/// Indices of the apps whose dots are shown
///
/// At most `max_dots` are shown. When there are more apps than that, the
/// window slides so the active app stays in view, roughly centered.
pub fn visible_window(count: usize, current: Option<usize>, max_dots: usize) -> Range<usize> {
    if count <= max_dots {
        return 0..count;
    }
    let start = current
        .unwrap_or(0)
        .saturating_sub(max_dots / 2)
        .min(count - max_dots);
    start..start + max_dots
}
