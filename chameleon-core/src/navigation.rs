//! Swipe navigation across the app carousel
//!
//! A press records its X position; the matching release decides. A release
//! more than the threshold to the right of the press goes to the previous
//! app, one more than the threshold to the left goes to the next app.
//! Anything shorter is a tap and is left to the active app.

use chameleon_hal::TouchSample;

use crate::app::{AppError, AppFramework, AppId};
use crate::event::EventBus;

/// Horizontal travel, in pixels, a swipe must exceed
pub const DEFAULT_SWIPE_THRESHOLD: u16 = 50;

/// Carousel step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavCommand {
    Previous,
    Next,
}

/// Gesture recognizer state
#[derive(Debug, Clone)]
pub struct Navigator {
    threshold: u16,
    touch_start_x: i32,
    touch_active: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl Navigator {
    pub const fn new(threshold: u16) -> Self {
        Self {
            threshold,
            touch_start_x: 0,
            touch_active: false,
        }
    }

    /// Forget any press in progress
    pub fn reset(&mut self) {
        self.touch_active = false;
        self.touch_start_x = 0;
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    /// A press has been seen and not yet released
    pub fn is_touch_active(&self) -> bool {
        self.touch_active
    }

    /// Feed one touch sample
    ///
    /// Presses while already pressed (drags) keep the original start.
    /// Releases without a press are ignored.
    pub fn process_touch(&mut self, sample: &TouchSample) -> Option<NavCommand> {
        if sample.pressed {
            if !self.touch_active {
                self.touch_active = true;
                self.touch_start_x = sample.x;
            }
            return None;
        }

        if !self.touch_active {
            return None;
        }
        self.touch_active = false;

        let delta = sample.x.saturating_sub(self.touch_start_x);
        if delta.unsigned_abs() <= self.threshold as u32 {
            return None;
        }

        if delta > 0 {
            debug!("Swipe right ({} px), previous app", delta);
            Some(NavCommand::Previous)
        } else {
            debug!("Swipe left ({} px), next app", delta);
            Some(NavCommand::Next)
        }
    }
}

/// App a command lands on, wrapping around the carousel
///
/// With no app active, `Next` starts at the first app and `Previous` at
/// the last. Returns `None` for an empty carousel.
pub fn carousel_target(current: Option<AppId>, count: usize, command: NavCommand) -> Option<AppId> {
    if count == 0 {
        return None;
    }
    let index = match (current, command) {
        (Some(id), NavCommand::Next) => (id.index() + 1) % count,
        (Some(id), NavCommand::Previous) => (id.index() + count - 1) % count,
        (None, NavCommand::Next) => 0,
        (None, NavCommand::Previous) => count - 1,
    };
    Some(AppId::new(index as u8))
}

/// Apply a command to the registry
///
/// Returns the app switched to, or `None` when there is nothing to switch.
pub fn navigate(
    apps: &mut AppFramework<'_>,
    bus: &EventBus<'_>,
    command: NavCommand,
) -> Result<Option<AppId>, AppError> {
    let Some(target) = carousel_target(apps.current(), apps.count(), command) else {
        return Ok(None);
    };
    apps.switch_to(target, bus)?;
    Ok(Some(target))
}
