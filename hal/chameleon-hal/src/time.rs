//! Time abstractions
//!
//! - [`Clock`]: monotonic time since boot, used for frame timing and event
//!   timestamps.
//! - [`TimeSource`]: wall-clock time kept in sync by an NTP client.

/// Monotonic clock
pub trait Clock {
    /// Microseconds since boot
    fn now_us(&self) -> u64;

    /// Milliseconds since boot (wraps after ~49 days)
    fn now_ms(&self) -> u32 {
        (self.now_us() / 1000) as u32
    }
}

/// Wall-clock errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    /// NTP client not initialized
    NotInitialized,
    /// No network connection
    NoNetwork,
    /// Server did not answer in time
    Timeout,
}

impl core::fmt::Display for TimeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TimeError::NotInitialized => write!(f, "time source not initialized"),
            TimeError::NoNetwork => write!(f, "no network for time sync"),
            TimeError::Timeout => write!(f, "time sync timed out"),
        }
    }
}

impl core::error::Error for TimeError {}

/// Wall-clock time source
pub trait TimeSource {
    /// Synchronize with an NTP server
    fn sync(&mut self, server: &str, timeout_ms: u32) -> Result<(), TimeError>;

    /// Local time as seconds since the Unix epoch (timezone applied)
    ///
    /// `None` until the clock has been set at least once.
    fn local_time(&self) -> Option<i64>;

    /// Whether the last sync succeeded
    fn is_synced(&self) -> bool;

    /// Set the timezone (POSIX TZ string, e.g. "CET-1CEST,M3.5.0,M10.5.0/3")
    fn set_timezone(&mut self, tz: &str);
}
