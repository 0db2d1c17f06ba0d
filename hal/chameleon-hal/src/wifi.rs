//! WiFi status abstraction
//!
//! The radio driver owns association and DHCP; the runtime only reads
//! status and asks for connect/disconnect.

use core::net::Ipv4Addr;

/// Station connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl WifiStatus {
    /// Short label for status lines
    pub fn label(&self) -> &'static str {
        match self {
            WifiStatus::Disconnected => "Disconnected",
            WifiStatus::Connecting => "Connecting",
            WifiStatus::Connected => "Connected",
            WifiStatus::Error => "Error",
        }
    }
}

/// WiFi errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiError {
    /// Radio not initialized
    NotInitialized,
    /// Association did not complete in time
    Timeout,
    /// Credentials rejected or SSID missing
    InvalidConfig,
    /// Operation requires a connection
    NotConnected,
}

impl core::fmt::Display for WifiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WifiError::NotInitialized => write!(f, "wifi not initialized"),
            WifiError::Timeout => write!(f, "wifi connect timed out"),
            WifiError::InvalidConfig => write!(f, "invalid wifi configuration"),
            WifiError::NotConnected => write!(f, "wifi not connected"),
        }
    }
}

impl core::error::Error for WifiError {}

/// WiFi station
pub trait WifiHal {
    /// Current connection status
    fn status(&self) -> WifiStatus;

    /// Signal strength in dBm, 0 when not connected
    fn rssi(&self) -> i8;

    /// Local IP address, if connected
    fn ip(&self) -> Option<Ipv4Addr>;

    /// Connect to a network
    fn connect(&mut self, ssid: &str, password: &str, timeout_ms: u32) -> Result<(), WifiError>;

    /// Drop the current connection
    fn disconnect(&mut self);
}
