//! Scripted touch input

use alloc::collections::VecDeque;

use chameleon_hal::{TouchError, TouchInput, TouchSample};

/// Touch controller that replays queued samples, one per poll
#[derive(Debug, Default)]
pub struct ScriptedTouch {
    queue: VecDeque<TouchSample>,
    calibrations: u32,
    fail_calibration: bool,
}

impl ScriptedTouch {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a sample
    pub fn push(&mut self, sample: TouchSample) {
        self.queue.push_back(sample);
    }

    /// Queue a press at `from_x` followed by a release at `to_x`
    pub fn swipe(&mut self, from_x: i32, to_x: i32, y: i32) {
        self.push(TouchSample::press(from_x, y, 0));
        self.push(TouchSample::release(to_x, y, 0));
    }

    /// Queue a tap at (x, y)
    pub fn tap(&mut self, x: i32, y: i32) {
        self.swipe(x, x, y);
    }

    /// Samples not yet read
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Make the next calibrations fail
    pub fn fail_calibration(&mut self, fail: bool) {
        self.fail_calibration = fail;
    }

    /// Number of calibration runs
    pub fn calibrations(&self) -> u32 {
        self.calibrations
    }
}

impl TouchInput for ScriptedTouch {
    fn read(&mut self) -> Option<TouchSample> {
        self.queue.pop_front()
    }

    fn calibrate(&mut self) -> Result<(), TouchError> {
        self.calibrations += 1;
        if self.fail_calibration {
            Err(TouchError::CalibrationFailed)
        } else {
            Ok(())
        }
    }
}
