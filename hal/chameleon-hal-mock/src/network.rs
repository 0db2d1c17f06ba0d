//! Settable WiFi and NTP stand-ins

use alloc::string::String;
use core::net::Ipv4Addr;

use chameleon_hal::{TimeError, TimeSource, WifiError, WifiHal, WifiStatus};

/// WiFi station whose outcome is decided by the test
#[derive(Debug, Clone)]
pub struct MockWifi {
    status: WifiStatus,
    rssi: i8,
    ip: Option<Ipv4Addr>,
    /// Network name `connect` accepts; `None` makes every attempt time out
    reachable_ssid: Option<String>,
    connect_attempts: u32,
}

impl Default for MockWifi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWifi {
    /// Disconnected station with no reachable network
    pub fn new() -> Self {
        Self {
            status: WifiStatus::Disconnected,
            rssi: 0,
            ip: None,
            reachable_ssid: None,
            connect_attempts: 0,
        }
    }

    /// Station that will accept `ssid`
    pub fn with_network(ssid: &str) -> Self {
        Self {
            reachable_ssid: Some(String::from(ssid)),
            ..Self::new()
        }
    }

    /// Force a status (e.g. to simulate a drop)
    pub fn set_status(&mut self, status: WifiStatus) {
        self.status = status;
        if status != WifiStatus::Connected {
            self.ip = None;
            self.rssi = 0;
        }
    }

    /// Number of connect calls
    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts
    }
}

impl WifiHal for MockWifi {
    fn status(&self) -> WifiStatus {
        self.status
    }

    fn rssi(&self) -> i8 {
        self.rssi
    }

    fn ip(&self) -> Option<Ipv4Addr> {
        self.ip
    }

    fn connect(&mut self, ssid: &str, _password: &str, _timeout_ms: u32) -> Result<(), WifiError> {
        self.connect_attempts += 1;
        if ssid.is_empty() {
            return Err(WifiError::InvalidConfig);
        }
        match self.reachable_ssid.as_deref() {
            Some(reachable) if reachable == ssid => {
                self.status = WifiStatus::Connected;
                self.rssi = -58;
                self.ip = Some(Ipv4Addr::new(192, 168, 1, 42));
                Ok(())
            }
            _ => {
                self.status = WifiStatus::Error;
                Err(WifiError::Timeout)
            }
        }
    }

    fn disconnect(&mut self) {
        self.set_status(WifiStatus::Disconnected);
    }
}

/// Wall clock with a fixed time that syncs on demand
#[derive(Debug, Clone, Default)]
pub struct MockTimeSource {
    time: Option<i64>,
    synced: bool,
    network_up: bool,
    timezone: String,
}

impl MockTimeSource {
    /// Unsynced source with no time set
    pub fn new() -> Self {
        Self::default()
    }

    /// Source whose server will answer with `unix_time`
    pub fn with_server_time(unix_time: i64) -> Self {
        Self {
            time: Some(unix_time),
            network_up: true,
            ..Self::default()
        }
    }

    /// Mark the network up or down
    pub fn set_network(&mut self, up: bool) {
        self.network_up = up;
    }

    /// Move the wall clock
    pub fn set_time(&mut self, unix_time: i64) {
        self.time = Some(unix_time);
    }

    /// Timezone last set
    pub fn timezone(&self) -> &str {
        &self.timezone
    }
}

impl TimeSource for MockTimeSource {
    fn sync(&mut self, server: &str, _timeout_ms: u32) -> Result<(), TimeError> {
        if !self.network_up {
            return Err(TimeError::NoNetwork);
        }
        if server.is_empty() || self.time.is_none() {
            return Err(TimeError::Timeout);
        }
        self.synced = true;
        Ok(())
    }

    fn local_time(&self) -> Option<i64> {
        self.time
    }

    fn is_synced(&self) -> bool {
        self.synced
    }

    fn set_timezone(&mut self, tz: &str) {
        self.timezone = String::from(tz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wifi_connects_to_reachable_network() {
        let mut wifi = MockWifi::with_network("home");
        assert!(wifi.connect("home", "secret", 10_000).is_ok());
        assert_eq!(wifi.status(), WifiStatus::Connected);
        assert!(wifi.ip().is_some());

        wifi.disconnect();
        assert_eq!(wifi.status(), WifiStatus::Disconnected);
        assert_eq!(wifi.rssi(), 0);
    }

    #[test]
    fn test_wifi_unknown_network_times_out() {
        let mut wifi = MockWifi::with_network("home");
        assert_eq!(wifi.connect("cafe", "", 10), Err(WifiError::Timeout));
        assert_eq!(wifi.status(), WifiStatus::Error);
        assert_eq!(wifi.connect_attempts(), 1);
    }

    #[test]
    fn test_time_sync_needs_network() {
        let mut time = MockTimeSource::with_server_time(1_700_000_000);
        time.set_network(false);
        assert_eq!(time.sync("pool.ntp.org", 5000), Err(TimeError::NoNetwork));
        time.set_network(true);
        assert!(time.sync("pool.ntp.org", 5000).is_ok());
        assert!(time.is_synced());
    }
}
