//! Frame timing statistics

/// Length of the window over which `fps` is measured
const FPS_WINDOW_US: u64 = 1_000_000;

/// Running frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Frames completed
    pub frames: u32,
    /// Frames whose processing exceeded the budget
    pub overruns: u32,
    /// Processing time of the last frame
    pub last_frame_us: u32,
    /// Longest processing time seen
    pub worst_frame_us: u32,
    /// Frames per second over the last full window
    pub fps: u16,
    window_start_us: u64,
    window_frames: u32,
}

impl FrameStats {
    pub const fn new() -> Self {
        Self {
            frames: 0,
            overruns: 0,
            last_frame_us: 0,
            worst_frame_us: 0,
            fps: 0,
            window_start_us: 0,
            window_frames: 0,
        }
    }

    /// Account for one finished frame
    ///
    /// `processing_us` is the time spent before sleeping, `now_us` the
    /// clock once the frame (including its sleep) is over.
    pub fn record(&mut self, processing_us: u64, overrun: bool, now_us: u64) {
        let processing = processing_us.min(u32::MAX as u64) as u32;
        self.frames = self.frames.wrapping_add(1);
        if overrun {
            self.overruns = self.overruns.wrapping_add(1);
        }
        self.last_frame_us = processing;
        self.worst_frame_us = self.worst_frame_us.max(processing);

        // The first frame only opens the window
        if self.frames == 1 {
            self.window_start_us = now_us;
            self.window_frames = 0;
            return;
        }
        self.window_frames += 1;

        let window = now_us.saturating_sub(self.window_start_us);
        if window >= FPS_WINDOW_US {
            let fps = (self.window_frames as u64 * FPS_WINDOW_US + window / 2) / window;
            self.fps = fps.min(u16::MAX as u64) as u16;
            self.window_start_us = now_us;
            self.window_frames = 0;
        }
    }
}
