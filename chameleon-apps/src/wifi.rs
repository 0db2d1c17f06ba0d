//! WiFi status screen

use core::fmt::Write;

use chameleon_core::app::{App, AppContext, AppInfo, Sector};
use chameleon_core::theme::ColorRole;
use chameleon_hal::color::named;
use chameleon_hal::{DisplayExt, Rgb565, WifiStatus};
use heapless::String;

const LABEL_X: i32 = 30;
const VALUE_X: i32 = 100;

/// Status line text and color
pub fn status_line(status: WifiStatus) -> (&'static str, Rgb565) {
    match status {
        WifiStatus::Connected => ("Connected", named::GREEN),
        WifiStatus::Connecting => ("Connecting...", named::YELLOW),
        WifiStatus::Disconnected => ("Disconnected", named::RED),
        WifiStatus::Error => ("Error", named::RED),
    }
}

/// Connection status, address, and signal strength
#[derive(Debug, Default)]
pub struct WifiApp;

impl WifiApp {
    pub const fn new() -> Self {
        Self
    }
}

impl App for WifiApp {
    fn info(&self) -> AppInfo {
        AppInfo::new("WiFi", "wifi", Sector::Communication)
    }

    fn init(&mut self) {
        debug!("WiFi app initialized");
    }

    fn on_update(&mut self, ctx: &mut AppContext<'_, '_>) {
        let primary = ctx.color(ColorRole::Primary);
        let foreground = ctx.color(ColorRole::Foreground);

        ctx.display
            .draw_text_centered(35, "WiFi Manager", primary, 2);

        let status = ctx.wifi.status();
        let (label, color) = status_line(status);
        ctx.display.draw_text(LABEL_X, 60, "Status:", foreground, 1);
        ctx.display.draw_text(VALUE_X, 60, label, color, 1);

        if status != WifiStatus::Connected {
            return;
        }

        let mut line: String<32> = String::new();
        if let Some(ip) = ctx.wifi.ip() {
            if write!(line, "IP: {}", ip).is_ok() {
                ctx.display.draw_text(LABEL_X, 80, &line, foreground, 1);
            }
        }

        line.clear();
        if write!(line, "Signal: {} dBm", ctx.wifi.rssi()).is_ok() {
            ctx.display.draw_text(LABEL_X, 95, &line, foreground, 1);
        }
    }
}
