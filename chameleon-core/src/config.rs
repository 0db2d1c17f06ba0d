//! Runtime configuration
//!
//! Every section has defaults matching the reference device (a 320x172
//! panel running at 60 Hz), so a configuration file only needs the values
//! it changes. With the `serde` feature the types deserialize from any
//! serde format; the simulator reads them from TOML.

use chameleon_hal::Geometry;
use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::navigation::DEFAULT_SWIPE_THRESHOLD;
use crate::theme::ThemeVariant;

/// Maximum SSID length (802.11)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Maximum NTP server host / POSIX TZ string length
pub const MAX_HOST_LEN: usize = 64;

/// Highest frame rate accepted
pub const MAX_TARGET_FPS: u16 = 240;

/// Most carousel dots the overlay will draw
pub const MAX_VISIBLE_DOTS: u8 = 20;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Zero-sized panel or gaps covering the whole panel
    InvalidGeometry,
    /// Frame rate of zero or above the maximum
    InvalidFrameRate,
    InvalidSwipeThreshold,
    /// Dot row or status bar does not fit the panel
    InvalidOverlay,
    /// Autoconnect requested without a network name
    MissingSsid,
}

impl ConfigError {
    pub fn code(&self) -> i8 {
        match self {
            ConfigError::InvalidGeometry => -1,
            ConfigError::InvalidFrameRate => -2,
            ConfigError::InvalidSwipeThreshold => -3,
            ConfigError::InvalidOverlay => -4,
            ConfigError::MissingSsid => -5,
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidGeometry => write!(f, "display geometry leaves no drawable area"),
            ConfigError::InvalidFrameRate => {
                write!(f, "target fps must be between 1 and {}", MAX_TARGET_FPS)
            }
            ConfigError::InvalidSwipeThreshold => write!(f, "swipe threshold must be non-zero"),
            ConfigError::InvalidOverlay => write!(f, "overlay does not fit the display"),
            ConfigError::MissingSsid => write!(f, "wifi autoconnect needs an ssid"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Panel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    pub width: u16,
    pub height: u16,
    /// Rows hidden by the bezel above the drawable area
    pub gap_top: u16,
    /// Rows hidden below the drawable area
    pub gap_bottom: u16,
    /// Backlight level applied at boot
    pub brightness: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 172,
            gap_top: 0,
            gap_bottom: 34,
            brightness: 255,
        }
    }
}

impl DisplayConfig {
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.width, self.height, self.gap_top, self.gap_bottom)
    }
}

/// Frame loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrameConfig {
    pub target_fps: u16,
    /// Warn when a frame runs over budget
    pub log_overruns: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            log_overruns: true,
        }
    }
}

impl FrameConfig {
    /// Per-frame budget in microseconds, rounded to nearest (60 fps = 16667)
    pub fn frame_time_us(&self) -> u64 {
        let fps = self.target_fps.max(1) as u64;
        (1_000_000 + fps / 2) / fps
    }
}

/// Gesture recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigationConfig {
    pub swipe_threshold_px: u16,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

/// Status bar and carousel dots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayConfig {
    pub status_bar_height: u16,
    pub dot_spacing: u16,
    /// Dot row distance from the bottom of the drawable area
    pub dot_offset: u16,
    pub max_dots: u8,
    pub dot_radius: u8,
    pub active_dot_radius: u8,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            status_bar_height: 20,
            dot_spacing: 12,
            dot_offset: 10,
            max_dots: MAX_VISIBLE_DOTS,
            dot_radius: 2,
            active_dot_radius: 3,
        }
    }
}

/// Theme selection at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThemeConfig {
    pub initial: ThemeVariant,
}

/// Station credentials
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WifiConfig {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
    pub timeout_ms: u32,
    /// Connect during boot
    pub autoconnect: bool,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            timeout_ms: 10_000,
            autoconnect: false,
        }
    }
}

/// Wall clock synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NtpConfig {
    pub server: String<MAX_HOST_LEN>,
    pub timeout_ms: u32,
    /// POSIX TZ string, e.g. `CET-1CEST,M3.5.0,M10.5.0/3`
    pub timezone: String<MAX_HOST_LEN>,
}

impl Default for NtpConfig {
    fn default() -> Self {
        Self {
            server: String::try_from("pool.ntp.org").unwrap_or_default(),
            timeout_ms: 5_000,
            timezone: String::try_from("UTC0").unwrap_or_default(),
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeConfig {
    pub display: DisplayConfig,
    pub frame: FrameConfig,
    pub navigation: NavigationConfig,
    pub overlay: OverlayConfig,
    pub theme: ThemeConfig,
    pub wifi: WifiConfig,
    pub ntp: NtpConfig,
}

impl RuntimeConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let display = &self.display;
        let gaps = display.gap_top as u32 + display.gap_bottom as u32;
        if display.width == 0 || gaps >= display.height as u32 {
            return Err(ConfigError::InvalidGeometry);
        }

        if self.frame.target_fps == 0 || self.frame.target_fps > MAX_TARGET_FPS {
            return Err(ConfigError::InvalidFrameRate);
        }

        if self.navigation.swipe_threshold_px == 0 {
            return Err(ConfigError::InvalidSwipeThreshold);
        }

        let overlay = &self.overlay;
        let drawable = display.geometry().effective_height();
        if overlay.max_dots == 0
            || overlay.max_dots > MAX_VISIBLE_DOTS
            || overlay.dot_spacing == 0
            || overlay.status_bar_height >= drawable
            || overlay.dot_offset >= drawable
            || overlay.max_dots as u32 * overlay.dot_spacing as u32 > display.width as u32
        {
            return Err(ConfigError::InvalidOverlay);
        }

        if self.wifi.autoconnect && self.wifi.ssid.is_empty() {
            return Err(ConfigError::MissingSsid);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = RuntimeConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.frame.frame_time_us(), 16_667);
        assert_eq!(config.display.geometry().effective_height(), 138);
        assert_eq!(config.ntp.server.as_str(), "pool.ntp.org");
    }

    #[test]
    fn test_frame_time_rounding() {
        let at = |fps| FrameConfig {
            target_fps: fps,
            log_overruns: false,
        };
        assert_eq!(at(30).frame_time_us(), 33_333);
        assert_eq!(at(50).frame_time_us(), 20_000);
        assert_eq!(at(240).frame_time_us(), 4_167);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = RuntimeConfig::default();
        config.frame.target_fps = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidFrameRate));

        let mut config = RuntimeConfig::default();
        config.display.gap_bottom = 172;
        assert_eq!(config.validate(), Err(ConfigError::InvalidGeometry));

        let mut config = RuntimeConfig::default();
        config.navigation.swipe_threshold_px = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSwipeThreshold));

        let mut config = RuntimeConfig::default();
        config.overlay.max_dots = 21;
        assert_eq!(config.validate(), Err(ConfigError::InvalidOverlay));

        let mut config = RuntimeConfig::default();
        config.wifi.autoconnect = true;
        assert_eq!(config.validate(), Err(ConfigError::MissingSsid));
        assert_eq!(ConfigError::MissingSsid.code(), -5);
    }
}
