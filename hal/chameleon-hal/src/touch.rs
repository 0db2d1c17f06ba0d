//! Touch input abstraction

/// One touch controller sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    /// X coordinate in drawing space
    pub x: i32,
    /// Y coordinate in drawing space
    pub y: i32,
    /// Finger is down
    pub pressed: bool,
    /// Controller timestamp (ms since boot)
    pub timestamp_ms: u32,
}

impl TouchSample {
    /// Finger down at (x, y)
    pub const fn press(x: i32, y: i32, timestamp_ms: u32) -> Self {
        Self {
            x,
            y,
            pressed: true,
            timestamp_ms,
        }
    }

    /// Finger lifted at (x, y)
    pub const fn release(x: i32, y: i32, timestamp_ms: u32) -> Self {
        Self {
            x,
            y,
            pressed: false,
            timestamp_ms,
        }
    }
}

/// Touch controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// Controller not initialized
    NotInitialized,
    /// Bus error talking to the controller
    Bus,
    /// Calibration did not converge
    CalibrationFailed,
}

impl core::fmt::Display for TouchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TouchError::NotInitialized => write!(f, "touch not initialized"),
            TouchError::Bus => write!(f, "touch bus error"),
            TouchError::CalibrationFailed => write!(f, "touch calibration failed"),
        }
    }
}

impl core::error::Error for TouchError {}

/// Touch controller
///
/// `read` must never block: it returns `None` immediately when the
/// controller has nothing new to report.
pub trait TouchInput {
    /// Poll for a new sample
    fn read(&mut self) -> Option<TouchSample>;

    /// Run the controller's calibration routine
    fn calibrate(&mut self) -> Result<(), TouchError> {
        Ok(())
    }
}
