//! Clock face
//!
//! Shows local time from the network time source together with its sync
//! state.

use core::fmt::Write;

use chameleon_core::app::{App, AppContext, AppInfo, Sector};
use chameleon_core::theme::ColorRole;
use chameleon_hal::color::named;
use chameleon_hal::DisplayExt;
use chrono::{DateTime, Datelike, Timelike};
use heapless::String;

/// `HH:MM:SS`
pub type TimeText = String<8>;

/// `YYYY-MM-DD`
pub type DateText = String<10>;

/// Split a local timestamp into display strings
///
/// Returns `None` for timestamps outside the representable calendar range
/// or years that do not fit four digits.
pub fn format_timestamp(local_time: i64) -> Option<(TimeText, DateText)> {
    let moment = DateTime::from_timestamp(local_time, 0)?.naive_utc();
    if !(0..=9999).contains(&moment.year()) {
        return None;
    }

    let mut time = TimeText::new();
    write!(
        time,
        "{:02}:{:02}:{:02}",
        moment.hour(),
        moment.minute(),
        moment.second()
    )
    .ok()?;

    let mut date = DateText::new();
    write!(
        date,
        "{:04}-{:02}-{:02}",
        moment.year(),
        moment.month(),
        moment.day()
    )
    .ok()?;

    Some((time, date))
}

#[derive(Debug, Default)]
pub struct ClockApp;

impl ClockApp {
    pub const fn new() -> Self {
        Self
    }
}

impl App for ClockApp {
    fn info(&self) -> AppInfo {
        AppInfo::new("Clock", "clock", Sector::Productivity)
    }

    fn init(&mut self) {
        debug!("Clock app initialized");
    }

    fn on_enter(&mut self) {
        debug!("Entering clock app");
    }

    fn on_update(&mut self, ctx: &mut AppContext<'_, '_>) {
        let primary = ctx.color(ColorRole::Primary);
        let foreground = ctx.color(ColorRole::Foreground);

        match ctx.time.local_time().and_then(format_timestamp) {
            Some((time, date)) => {
                ctx.display.draw_text_centered(45, &time, primary, 3);
                ctx.display.draw_text_centered(85, &date, foreground, 1);
            }
            None => {
                ctx.display.draw_text_centered(45, "--:--:--", primary, 3);
            }
        }

        if ctx.time.is_synced() {
            ctx.display.draw_text_centered(105, "Synced", named::GREEN, 1);
        } else {
            ctx.display
                .draw_text_centered(105, "Not Synced", named::YELLOW, 1);
        }
    }

    fn on_exit(&mut self) {
        debug!("Exiting clock app");
    }
}
